//! System prompt composition from active lenses.
//!
//! Pure function over the ordered set of active lenses for one side.
//! Input order is significant and preserved: lens 1 in the list is lens 1
//! in the numbered output.

use super::types::Lens;

/// Baseline system prompt sent when no lenses are active. Always the prefix
/// of every composed prompt.
pub const BASELINE_SYSTEM_PROMPT: &str = "You are a thoughtful conversation partner. \
Give direct, substantive answers grounded in reasoning the reader can follow. \
Be concise without being curt, and say so plainly when you are uncertain.";

/// Composes the system prompt for one side from its active lenses.
///
/// - No lenses: the baseline prompt, unchanged.
/// - One lens: the baseline plus a single labeled mindset section.
/// - Two or more: the baseline plus an instruction to apply all mindsets
///   simultaneously, followed by a numbered list in input order.
pub fn compose_lens_prompt(lenses: &[Lens]) -> String {
    match lenses {
        [] => BASELINE_SYSTEM_PROMPT.to_string(),
        [lens] => format!(
            "{}\n\n## Active Mindset: {}\n{}",
            BASELINE_SYSTEM_PROMPT,
            lens.name(),
            lens.prompt()
        ),
        _ => {
            let lens_instructions = lenses
                .iter()
                .enumerate()
                .map(|(i, l)| format!("{}. **{}**: {}", i + 1, l.name(), l.prompt()))
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                "{}\n\n## Active Mindsets\nApply ALL of the following cognitive lenses \
                 simultaneously. Synthesize their perspectives into a coherent response:\n\n\
                 {}\n\nIntegrate these perspectives naturally — don't just list each \
                 viewpoint separately.",
                BASELINE_SYSTEM_PROMPT, lens_instructions
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lenses::presets::{find_preset, preset_lenses};

    fn lens(id: &str) -> Lens {
        Lens::Preset(find_preset(id).expect("preset should exist"))
    }

    #[test]
    fn test_zero_lenses_returns_baseline_unchanged() {
        assert_eq!(compose_lens_prompt(&[]), BASELINE_SYSTEM_PROMPT);
    }

    #[test]
    fn test_single_lens_shape() {
        let prompt = compose_lens_prompt(&[lens("devils-advocate")]);
        assert!(prompt.starts_with(BASELINE_SYSTEM_PROMPT));
        assert!(prompt.contains("## Active Mindset: Devil's Advocate"));
        // Prompt text embedded verbatim
        assert!(prompt.contains("Play devil's advocate."));
        // Single-lens form has no numbered list
        assert!(!prompt.contains("1. **"));
    }

    #[test]
    fn test_multi_lens_shape() {
        let prompt = compose_lens_prompt(&[lens("valley-founder"), lens("first-principles")]);
        assert!(prompt.starts_with(BASELINE_SYSTEM_PROMPT));
        assert!(prompt.contains("## Active Mindsets"));
        assert!(prompt.contains("simultaneously"));
        assert!(prompt.contains("1. **Valley Founder**:"));
        assert!(prompt.contains("2. **First Principles Only**:"));
    }

    #[test]
    fn test_multi_lens_preserves_input_order() {
        let forward = compose_lens_prompt(&[lens("valley-founder"), lens("10x-engineer")]);
        let reversed = compose_lens_prompt(&[lens("10x-engineer"), lens("valley-founder")]);

        assert!(forward.contains("1. **Valley Founder**"));
        assert!(reversed.contains("1. **10x Engineer**"));
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_baseline_is_prefix_for_all_lengths() {
        let all: Vec<Lens> = preset_lenses().into_iter().map(Lens::Preset).collect();
        for n in 0..=all.len() {
            let prompt = compose_lens_prompt(&all[..n]);
            assert!(prompt.starts_with(BASELINE_SYSTEM_PROMPT), "n = {}", n);
        }
    }

    #[test]
    fn test_full_catalog_enumerated_one_based() {
        let all: Vec<Lens> = preset_lenses().into_iter().map(Lens::Preset).collect();
        let prompt = compose_lens_prompt(&all);
        for (i, lens) in all.iter().enumerate() {
            assert!(prompt.contains(&format!("{}. **{}**:", i + 1, lens.name())));
        }
    }
}
