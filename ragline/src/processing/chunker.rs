use unicode_segmentation::UnicodeSegmentation;

use crate::config::ProcessingConfig;

/// Break points tried in order when a chunk has to end before the text does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Paragraph,
    Line,
    Sentence,
    Word,
}

const BOUNDARIES: [Boundary; 4] = [
    Boundary::Paragraph,
    Boundary::Line,
    Boundary::Sentence,
    Boundary::Word,
];

/// Splits text into overlapping windows of at most `chunk_size` characters.
///
/// Sizes are counted in `char`s, the same unit the prompt budget uses. Cuts
/// only land on extended grapheme cluster boundaries, so a window never
/// splits a `\r\n` pair or a combining sequence; when the limit falls inside
/// a cluster the window backs off to the previous boundary. Consecutive
/// chunks share up to `chunk_overlap` characters (exactly that many when the
/// boundary allows); a chunk ends on the latest paragraph, line, sentence or
/// word break that still leaves it at least half full, and on a hard cut
/// otherwise.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

/// One window of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub content: String,
    /// Byte offset of `content` in the source text.
    pub start: usize,
}

/// Grapheme clusters of a text with their byte offsets and the running
/// `char` count before each one.
struct Graphemes<'a> {
    clusters: Vec<(usize, &'a str)>,
    /// `chars_before[i]` is the number of chars preceding cluster `i`; the
    /// extra last entry is the char length of the whole text.
    chars_before: Vec<usize>,
    text_len: usize,
}

impl<'a> Graphemes<'a> {
    fn new(text: &'a str) -> Self {
        let clusters: Vec<(usize, &str)> = text.grapheme_indices(true).collect();
        let mut chars_before = Vec::with_capacity(clusters.len() + 1);
        let mut count = 0;
        chars_before.push(count);
        for (_, cluster) in &clusters {
            count += cluster.chars().count();
            chars_before.push(count);
        }

        Self {
            clusters,
            chars_before,
            text_len: text.len(),
        }
    }

    fn len(&self) -> usize {
        self.clusters.len()
    }

    fn get(&self, index: usize) -> Option<&'a str> {
        self.clusters.get(index).map(|(_, cluster)| *cluster)
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.clusters
            .get(index)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.text_len)
    }

    /// Chars between cluster boundaries `from` and `to`.
    fn chars_between(&self, from: usize, to: usize) -> usize {
        self.chars_before[to] - self.chars_before[from]
    }

    /// Last boundary at or after `from` whose distance from `from` is at
    /// most `max_chars`.
    fn last_within(&self, from: usize, max_chars: usize) -> usize {
        let limit = self.chars_before[from] + max_chars;
        self.chars_before.partition_point(|&count| count <= limit) - 1
    }

    /// First boundary at or before `to` whose distance to `to` is at most
    /// `max_chars`.
    fn first_within_back(&self, to: usize, max_chars: usize) -> usize {
        let limit = self.chars_before[to].saturating_sub(max_chars);
        self.chars_before.partition_point(|&count| count < limit)
    }

    /// First boundary at or after `from` that is at least `min_chars` away.
    fn first_beyond(&self, from: usize, min_chars: usize) -> usize {
        let limit = self.chars_before[from] + min_chars;
        self.chars_before.partition_point(|&count| count < limit)
    }
}

impl TextChunker {
    pub fn new(config: &ProcessingConfig) -> Self {
        Self::with_sizes(config.chunk_size, config.chunk_overlap)
    }

    pub fn with_sizes(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let graphemes = Graphemes::new(text);
        let total = graphemes.len();

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            if graphemes.chars_between(start, total) <= self.chunk_size {
                chunks.push(TextChunk {
                    content: text[graphemes.byte_offset(start)..].to_string(),
                    start: graphemes.byte_offset(start),
                });
                break;
            }

            let end = self.find_end(&graphemes, start);
            chunks.push(TextChunk {
                content: text[graphemes.byte_offset(start)..graphemes.byte_offset(end)]
                    .to_string(),
                start: graphemes.byte_offset(start),
            });
            if end == total {
                break;
            }

            start = graphemes
                .first_within_back(end, self.chunk_overlap)
                .max(start + 1);
        }

        chunks
    }

    /// Convenience wrapper returning only the chunk texts.
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        self.chunk(text).into_iter().map(|c| c.content).collect()
    }

    /// Exclusive grapheme index where the chunk starting at `start` ends.
    fn find_end(&self, graphemes: &Graphemes<'_>, start: usize) -> usize {
        // A single cluster wider than the whole window is emitted on its own.
        let hard_end = graphemes.last_within(start, self.chunk_size).max(start + 1);
        // Stay past the overlap so the next chunk always advances, and past
        // the midpoint so natural breaks never produce slivers.
        let min_end = graphemes
            .first_beyond(start, (self.chunk_overlap + 1).max(self.chunk_size / 2))
            .max(start + 1);

        for boundary in BOUNDARIES {
            if let Some(end) = (min_end..=hard_end)
                .rev()
                .find(|&end| Self::ends_with(graphemes, end, boundary))
            {
                return end;
            }
        }

        hard_end
    }

    fn ends_with(graphemes: &Graphemes<'_>, end: usize, boundary: Boundary) -> bool {
        let at = |back: usize| end.checked_sub(back).and_then(|index| graphemes.get(index));

        match boundary {
            Boundary::Paragraph => at(1).is_some_and(is_newline) && at(2).is_some_and(is_newline),
            Boundary::Line => at(1).is_some_and(is_newline),
            Boundary::Sentence => {
                at(1).is_some_and(is_whitespace)
                    && at(2).is_some_and(|g| matches!(g, "." | "!" | "?"))
            }
            Boundary::Word => at(1).is_some_and(is_whitespace),
        }
    }
}

fn is_newline(grapheme: &str) -> bool {
    matches!(grapheme, "\n" | "\r\n" | "\r")
}

fn is_whitespace(grapheme: &str) -> bool {
    grapheme.chars().all(char::is_whitespace)
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(&ProcessingConfig::default())
    }
}
