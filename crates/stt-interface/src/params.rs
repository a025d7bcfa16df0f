use crate::common_derives;

common_derives! {
    pub struct ListenParams {
        pub model: String,
        pub language: String,
        pub encoding: String,
        pub sample_rate: u32,
        pub channels: u8,
        pub interim_results: bool,
        pub punctuate: bool,
        pub smart_format: bool,
    }
}

impl Default for ListenParams {
    fn default() -> Self {
        Self {
            model: "nova-2".to_string(),
            language: "en".to_string(),
            encoding: "linear16".to_string(),
            sample_rate: 16000,
            channels: 1,
            interim_results: true,
            punctuate: true,
            smart_format: true,
        }
    }
}

impl ListenParams {
    pub fn to_query(&self) -> String {
        format!(
            "model={}&language={}&encoding={}&sample_rate={}&channels={}&interim_results={}&punctuate={}&smart_format={}",
            self.model,
            self.language,
            self.encoding,
            self.sample_rate,
            self.channels,
            self.interim_results,
            self.punctuate,
            self.smart_format,
        )
    }

    pub fn build_ws_url(&self, api_base: &str) -> Result<url::Url, url::ParseError> {
        let mut url = url::Url::parse(api_base)?;
        url.set_query(Some(&self.to_query()));
        Ok(url)
    }
}
