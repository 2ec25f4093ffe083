//! Input cleanup and prompt-injection screening for caller-supplied text.

use regex::Regex;
use std::sync::LazyLock;

static SUSPICIOUS: LazyLock<Regex> = LazyLock::new(|| {
    let patterns = [
        r"ignore (previous|all|above|prior) (instructions|prompts|commands)",
        r"disregard (previous|all|above|prior) (instructions|prompts|commands)",
        r"forget (previous|all|above|prior) (instructions|prompts|commands)",
        r"you are now",
        r"new (instructions|rules|role|personality)",
        r"system (prompt|message|role)",
        r"<\|.*?\|>",
        r"###\s*instruction",
        r"---\s*instruction",
        r"act as (if|though)",
        r"pretend (you are|to be)",
        r"roleplay as",
        r"simulate (being|a)",
        r"(execute|run) (code|command|script)",
        r"admin (mode|access|override)",
        r"developer (mode|access|override)",
        r"sudo",
        r"\[SYSTEM\]",
        r"\[ADMIN\]",
    ];
    Regex::new(&format!("(?i){}", patterns.join("|"))).expect("static pattern compiles")
});

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{4,}").expect("static pattern compiles"));
static EXCESS_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {4,}").expect("static pattern compiles"));

const SPECIAL_CHARS: &str = "<>[]{}|#*`";
const MAX_SPECIAL_RATIO: f64 = 0.15;
const INSTRUCTION_WORDS: [&str; 6] = [
    "instruction",
    "command",
    "prompt",
    "system",
    "ignore",
    "disregard",
];
const MAX_INSTRUCTION_WORD_REPEATS: usize = 3;

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{2060}' | '\u{feff}')
}

/// Normalize caller text: cap at `max_chars`, strip control and zero-width
/// characters, squeeze long runs of newlines/spaces, trim.
pub fn sanitize(text: &str, max_chars: usize) -> String {
    let kept: String = text
        .chars()
        .take(max_chars)
        .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
        .filter(|c| !is_zero_width(*c))
        .collect();
    let squeezed = EXCESS_NEWLINES.replace_all(&kept, "\n\n\n");
    let squeezed = EXCESS_SPACES.replace_all(&squeezed, "   ");
    squeezed.trim().to_string()
}

/// Returns the reason text is rejected, if it looks like an injection attempt.
pub fn screen(text: &str) -> Result<(), &'static str> {
    if text.is_empty() {
        return Ok(());
    }
    if SUSPICIOUS.is_match(text) {
        return Err("suspicious instruction patterns detected");
    }

    let total = text.chars().count().max(1);
    let special = text.chars().filter(|c| SPECIAL_CHARS.contains(*c)).count();
    if special as f64 / total as f64 > MAX_SPECIAL_RATIO {
        return Err("excessive special characters");
    }

    let lowered = text.to_lowercase();
    if INSTRUCTION_WORDS
        .iter()
        .any(|word| lowered.matches(word).count() > MAX_INSTRUCTION_WORD_REPEATS)
    {
        return Err("repeated suspicious keywords");
    }

    Ok(())
}
