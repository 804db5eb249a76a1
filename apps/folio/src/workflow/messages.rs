// User-visible strings shown by the progress indicator.
// Phrases are ordered; the presenter maps percent into 20-point bands over them.

/// Band phrases, one per 20 percentage points.
pub const PHRASES: &[&str] = &[
    "Analyzing your resume...",
    "Extracting your experience and skills...",
    "Writing your portfolio content...",
    "Designing your portfolio pages...",
    "Adding the finishing touches...",
];

pub const SUCCESS_MESSAGE: &str = "Portfolio generated successfully! Redirecting...";

pub const RETRY_MESSAGE: &str = "Error checking status. Retrying...";

pub const TIMEOUT_MESSAGE: &str =
    "Portfolio generation is taking longer than expected. Please try again later.";

/// Width of one phrase band in percentage points.
const BAND_WIDTH: u8 = 20;

/// Phrase for a percent value, clamped to the last phrase.
pub fn phrase_for(percent: u8) -> &'static str {
    let band = (percent / BAND_WIDTH) as usize;
    PHRASES[band.min(PHRASES.len() - 1)]
}
