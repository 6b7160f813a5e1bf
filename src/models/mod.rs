mod difficulty;
pub use difficulty::*;

mod game_session;
pub use game_session::*;

mod notice;
pub use notice::*;

mod score_record;
pub use score_record::*;
