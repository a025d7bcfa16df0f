pub mod accumulator;
pub mod types;
pub mod view;

pub use accumulator::StreamAccumulator;
pub use types::{ConversationEntry, MergeUpdate, Speaker};
pub use view::ConversationView;
