pub mod heroes;
pub mod input;
pub mod map_types;
pub mod opponents;
pub mod players;
pub mod range;

pub use heroes::{hero_detail, hero_view, HeroDetail, HeroSummary};
pub use input::{assemble_window, MapAnalysisInput, PlayerLine, ReviewSummary};
pub use map_types::{map_type_view, MapTypeTally};
pub use opponents::{opponent_view, OpponentView};
pub use players::{player_detail, player_view, PlayerDetail, PlayerSummary};
pub use range::RangeSelector;
