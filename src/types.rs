/// Identifier for one of the two input streams.
/// Examples: `regular`, `emergency`
pub type StreamId = String;
/// Keyword text as it appears in `top_keywords`.
/// Examples: `GPT-5`, `AI regulation`
pub type Keyword = String;
/// ISO calendar date string as stored in feeds.
/// Example: `2025-01-12`
pub type DateString = String;
/// Issue index score (typically 0-100, never clamped).
/// Examples: `60`, `71.5`
pub type Score = f64;
/// Signed percent change against the previous period.
/// Examples: `18.5`, `-3.2`
pub type Percentage = f64;
