/// Share of the ceiling after which a `##` header starts a new chunk.
const HEADER_BREAK_RATIO: f64 = 0.7;

#[derive(Default)]
struct Buffer<'a> {
    lines: Vec<&'a str>,
    chars: usize,
}

impl<'a> Buffer<'a> {
    /// Length after appending `line`, counting the joining newline.
    fn len_with(&self, line_chars: usize) -> usize {
        if self.lines.is_empty() {
            line_chars
        } else {
            self.chars + 1 + line_chars
        }
    }

    fn push(&mut self, line: &'a str, line_chars: usize) {
        self.chars = self.len_with(line_chars);
        self.lines.push(line);
    }

    fn flush_into(&mut self, chunks: &mut Vec<String>) {
        let lines = std::mem::take(&mut self.lines);
        self.chars = 0;

        let start = lines.iter().position(|l| !l.trim().is_empty());
        let end = lines.iter().rposition(|l| !l.trim().is_empty());
        if let (Some(start), Some(end)) = (start, end) {
            chunks.push(lines[start..=end].join("\n"));
        }
    }
}

/// Splits `text` into pieces of at most `ceiling` characters along line
/// boundaries, preferring to break before `##` headers once a chunk is
/// mostly full.
///
/// A single line longer than the ceiling is the only thing ever cut, and it
/// is cut on character boundaries. Blank lines at the edges of a chunk are
/// dropped.
pub fn chunk_report(text: &str, ceiling: usize) -> Vec<String> {
    let ceiling = ceiling.max(1);
    let header_threshold = (ceiling as f64 * HEADER_BREAK_RATIO) as usize;
    let mut chunks = Vec::new();
    let mut buf = Buffer::default();

    for line in text.lines() {
        let line_chars = line.chars().count();

        if line_chars > ceiling {
            buf.flush_into(&mut chunks);
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(ceiling) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        if line.starts_with("##") && buf.chars > header_threshold {
            buf.flush_into(&mut chunks);
        }
        if buf.len_with(line_chars) > ceiling {
            buf.flush_into(&mut chunks);
        }
        buf.push(line, line_chars);
    }
    buf.flush_into(&mut chunks);

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn non_blank_lines(text: &str) -> Vec<String> {
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    fn long_report(sections: usize) -> String {
        let mut out = String::from("# Weekly Report\n\n");
        for s in 0..sections {
            out.push_str(&format!("## Section {s}\n\n"));
            for i in 0..25 {
                out.push_str(&format!("- item {i} of section {s} with a little padding text\n"));
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn short_text_is_single_chunk() {
        let chunks = chunk_report("## Title\n\nhello\nworld", 4000);
        assert_eq!(chunks, vec!["## Title\n\nhello\nworld".to_string()]);
    }

    #[test]
    fn chunks_never_exceed_ceiling() {
        let text = long_report(12);
        for ceiling in [120, 500, 1000, 4000] {
            for chunk in chunk_report(&text, ceiling) {
                assert!(chunk.chars().count() <= ceiling, "chunk over {ceiling}");
            }
        }
    }

    #[test]
    fn lines_are_preserved_in_order() {
        let text = long_report(12);
        let chunks = chunk_report(&text, 1000);
        assert!(chunks.len() > 1);

        let rejoined: Vec<String> = chunks.iter().flat_map(|c| non_blank_lines(c)).collect();
        assert_eq!(rejoined, non_blank_lines(&text));
    }

    #[test]
    fn no_line_is_split() {
        let text = long_report(6);
        let originals: Vec<&str> = text.lines().collect();
        for chunk in chunk_report(&text, 700) {
            for line in chunk.lines() {
                assert!(originals.contains(&line), "line was altered: {line:?}");
            }
        }
    }

    #[test]
    fn prefers_header_boundaries_when_mostly_full() {
        let text = long_report(8);
        let chunks = chunk_report(&text, 4000);
        // Every chunk after the first one that is not a forced overflow starts at a header.
        let header_starts = chunks.iter().skip(1).filter(|c| c.starts_with("## ")).count();
        assert!(header_starts >= 1);
    }

    #[test]
    fn overlong_line_is_cut_to_ceiling() {
        let text = format!("intro\n{}\noutro", "x".repeat(25));
        let chunks = chunk_report(&text, 10);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), format!("intro{}outro", "x".repeat(25)));
    }

    #[test]
    fn multibyte_text_counts_characters() {
        let text = "é".repeat(30) + "\n" + &"ü".repeat(30);
        let chunks = chunk_report(&text, 40);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.chars().count() == 30));
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(chunk_report("", 100).is_empty());
        assert!(chunk_report("\n\n  \n", 100).is_empty());
    }
}
