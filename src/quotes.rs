use rand::seq::SliceRandom;
use rand::thread_rng;

pub const QUOTES: [&str; 5] = [
    "Believe you can and you're halfway there.",
    "Small steps in the right direction can turn out to be the biggest step of your life.",
    "Your future is created by what you do today, not tomorrow.",
    "Don't watch the clock; do what it does. Keep going.",
    "Act as if what you do makes a difference. It does.",
];

/// Picks a quote uniformly at random.
pub fn random_quote() -> &'static str {
    QUOTES.choose(&mut thread_rng()).copied().unwrap_or(QUOTES[0])
}
