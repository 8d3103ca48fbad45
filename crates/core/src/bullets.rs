//! Prompt construction and bullet extraction for generated slide content.

/// Longest bullet the prompt asks for, in words.
const BULLET_WORD_LIMIT: usize = 18;

/// Longest speaker note the prompt asks for, in words.
const NOTES_WORD_LIMIT: usize = 120;

/// Fallback fragments shorter than this many words are discarded.
const MIN_FRAGMENT_WORDS: usize = 3;

fn is_bullet_decoration(c: char) -> bool {
    matches!(c, '-' | '•' | ' ' | '\n' | '\t')
}

fn is_numbering(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ')' | '.' | ' ')
}

/// Prompt asking the model to summarize `content` as slide bullets.
pub fn bullet_prompt(content: &str, max_bullets: usize) -> String {
    format!(
        "Summarize the following content into concise presentation bullets. \
         Return {} or fewer bullet points. Do not number them. \
         Keep each bullet under {} words.\n\nContent:\n{}",
        max_bullets, BULLET_WORD_LIMIT, content
    )
}

/// Prompt asking the model for a speaker note covering one slide.
pub fn speaker_notes_prompt(title: &str, bullets: &[String]) -> String {
    format!(
        "Write a concise speaker note for a presentation slide titled '{}'. \
         Use the following bullet points as the slide content: {} \
         Keep it under {} words and conversational.",
        title,
        bullets.join(" | "),
        NOTES_WORD_LIMIT
    )
}

/// Extract up to `max_bullets` bullets from free-form model output.
///
/// Models often ignore the one-bullet-per-line request and return a single
/// paragraph. When two or fewer lines come back, the output is re-split on
/// bullet glyphs and full stops, keeping fragments of at least three words.
pub fn parse_bullets(output: &str, max_bullets: usize) -> Vec<String> {
    let mut lines: Vec<&str> = output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.trim_matches(is_bullet_decoration))
        .collect();

    if lines.len() <= 2 {
        let fragments: Vec<&str> = output
            .split(['•', '\n'])
            .flat_map(|piece| piece.split('.'))
            .map(|seg| seg.trim_matches(is_bullet_decoration))
            .filter(|seg| seg.split_whitespace().count() >= MIN_FRAGMENT_WORDS)
            .collect();

        if !fragments.is_empty() {
            lines = fragments;
        }
    }

    lines
        .into_iter()
        .map(|l| {
            l.trim_start_matches(is_numbering)
                .trim_matches(is_bullet_decoration)
        })
        .filter(|l| !l.is_empty())
        .take(max_bullets)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_prompt_mentions_limits() {
        let prompt = bullet_prompt("Some content", 4);
        assert!(prompt.contains("Return 4 or fewer bullet points"));
        assert!(prompt.contains("under 18 words"));
        assert!(prompt.ends_with("Content:\nSome content"));
    }

    #[test]
    fn test_speaker_notes_prompt_joins_bullets() {
        let bullets = vec!["First point".to_string(), "Second point".to_string()];
        let prompt = speaker_notes_prompt("Section 1", &bullets);
        assert!(prompt.contains("titled 'Section 1'"));
        assert!(prompt.contains("First point | Second point"));
        assert!(prompt.contains("under 120 words"));
    }

    #[test]
    fn test_parse_line_per_bullet() {
        let output = "- LLMs change how people use software\n• They follow instructions\n- They generate content\n";
        assert_eq!(
            parse_bullets(output, 5),
            vec![
                "LLMs change how people use software",
                "They follow instructions",
                "They generate content"
            ]
        );
    }

    #[test]
    fn test_parse_strips_numbering() {
        let output = "1. First idea here\n2) Second idea here\n3. Third idea here";
        assert_eq!(
            parse_bullets(output, 5),
            vec!["First idea here", "Second idea here", "Third idea here"]
        );
    }

    #[test]
    fn test_parse_respects_max_bullets() {
        let output = "a one\nb two\nc three\nd four\ne five";
        assert_eq!(parse_bullets(output, 2), vec!["a one", "b two"]);
    }

    #[test]
    fn test_paragraph_falls_back_to_sentences() {
        let output = "Models understand context well. They can follow instructions. Ok. \
                      Demos show chunking and export";
        assert_eq!(
            parse_bullets(output, 5),
            vec![
                "Models understand context well",
                "They can follow instructions",
                "Demos show chunking and export"
            ]
        );
    }

    #[test]
    fn test_inline_bullet_glyphs_fall_back() {
        let output = "• Chunk the input text • Ask the model for bullets";
        assert_eq!(
            parse_bullets(output, 5),
            vec!["Chunk the input text", "Ask the model for bullets"]
        );
    }

    #[test]
    fn test_short_output_is_kept_when_fallback_finds_nothing() {
        assert_eq!(parse_bullets("Overview", 4), vec!["Overview"]);
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_bullets("", 4).is_empty());
        assert!(parse_bullets("\n - \n", 4).is_empty());
    }
}
