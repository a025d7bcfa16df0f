mod params;
pub mod stream;

pub use params::ListenParams;
pub use stream::{StreamEvent, StreamResponse, TranscriptFragment};

macro_rules! common_derives {
    ($item:item) => {
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        $item
    };
}

pub(crate) use common_derives;
