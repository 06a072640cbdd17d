//! Built-in topic list used when a request carries no topic.

use rand::seq::SliceRandom;

/// Pre-written topics picked uniformly at random for empty topic seeds.
pub const DEFAULT_TOPICS: &[&str] = &[
    "AI development expertise and projects",
    "MERN stack and Next.js development",
    "Game development with Unreal Engine",
    "Looking for co-founders and teammates",
    "IT sector innovations and ideas",
    "Professional achievements and capabilities",
    "Technology trends and insights",
    "Building AI-powered automation tools",
];

/// Return the trimmed topic, or a random default when it is empty or absent.
pub fn resolve_topic(topic: Option<&str>) -> String {
    match topic.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_TOPICS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("Technology trends and insights")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_topic_is_kept() {
        assert_eq!(resolve_topic(Some("  Rust at work ")), "Rust at work");
    }

    #[test]
    fn test_empty_topic_uses_default_list() {
        for _ in 0..20 {
            let topic = resolve_topic(Some("   "));
            assert!(DEFAULT_TOPICS.contains(&topic.as_str()));
        }
        assert!(DEFAULT_TOPICS.contains(&resolve_topic(None).as_str()));
    }
}
