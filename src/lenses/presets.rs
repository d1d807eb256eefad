//! Bundled preset lens catalog.

use super::types::PresetLens;

fn preset(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    category: &str,
    prompt: &str,
) -> PresetLens {
    PresetLens {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        category: category.to_string(),
        prompt: prompt.to_string(),
    }
}

/// Returns the fixed catalog of bundled preset lenses.
pub fn preset_lenses() -> Vec<PresetLens> {
    vec![
        preset(
            "valley-founder",
            "Valley Founder",
            "Analyze through startup lens: TAM, velocity, moats, market timing, fundraising potential.",
            "Rocket",
            "Business",
            "Analyze through the lens of a Silicon Valley startup founder. Consider: total addressable market (TAM), growth velocity, competitive moats, market timing, product-market fit, and fundraising potential. Focus on scalability, disruption potential, and venture-scale outcomes.",
        ),
        preset(
            "dark-witty-humor",
            "Dark Witty Humor",
            "Respond with dry, sardonic wit. Think Hitchens meets Carlin — sharp, dark, unapologetically clever.",
            "Skull",
            "Style",
            "Respond with dark, sardonic wit and dry humor. Channel the sharpness of Christopher Hitchens, the irreverence of George Carlin, and the deadpan delivery of Aubrey Plaza. Be clever, not crude. Use irony, understatement, and unexpected turns of phrase. Don't shy away from uncomfortable truths — wrap them in humor that makes people laugh and then think. Every response should have at least one line that makes someone do a double-take.",
        ),
        preset(
            "contrarian-investor",
            "Contrarian Investor",
            "Challenge consensus. Find hidden risks, overlooked opportunities, and contrarian positions.",
            "TrendingDown",
            "Business",
            "Take a contrarian investor perspective. Challenge consensus views, identify hidden risks that others miss, find overlooked opportunities, and articulate contrarian positions. Question popular narratives and look for asymmetric opportunities where the crowd is wrong.",
        ),
        preset(
            "first-principles",
            "First Principles Only",
            "Reason from axioms and fundamental truths. No analogies, no 'best practices'. Derive everything from scratch.",
            "Atom",
            "Reasoning",
            "Reason from first principles only. Start from fundamental truths and axioms. Do not use analogies, appeal to authority, or rely on 'best practices'. Derive conclusions from basic physics, mathematics, logic, and human nature. Question every assumption and rebuild reasoning from the ground up.",
        ),
        preset(
            "devils-advocate",
            "Devil's Advocate",
            "Argue against whatever is presented. Find flaws, weaknesses, and failure modes.",
            "Shield",
            "Reasoning",
            "Play devil's advocate. Argue against whatever is presented. Find flaws, weaknesses, edge cases, and potential failure modes. Challenge assumptions, identify risks, and stress-test ideas. Be intellectually honest but maximally critical.",
        ),
        preset(
            "10x-engineer",
            "10x Engineer",
            "Evaluate through system design lens: scalability, tech debt, tradeoffs, DX, and maintenance burden.",
            "Code",
            "Technology",
            "Evaluate through the lens of an elite 10x engineer. Consider: system design quality, scalability constraints, technical debt implications, architectural tradeoffs, developer experience, maintenance burden, performance characteristics, and long-term sustainability. Focus on building systems that last and scale.",
        ),
    ]
}

/// Looks up a preset lens by id.
pub fn find_preset(id: &str) -> Option<PresetLens> {
    preset_lenses().into_iter().find(|lens| lens.id == id)
}
