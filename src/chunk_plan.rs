use serde::{Deserialize, Serialize};

/// Split `text` into pieces of at most `max_chars` characters, breaking at the
/// last whitespace inside each window. Leading whitespace is skipped before a
/// window opens; a window with no usable whitespace is cut at its full width. Chunks are trimmed and never empty.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    // Byte offset of every char boundary, including the end of the text.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = bounds.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < total {
        // A window never opens on whitespace, so a word that fits is kept whole.
        while start < total && text[bounds[start]..].starts_with(char::is_whitespace) {
            start += 1;
        }
        if start == total {
            break;
        }

        let mut end = (start + max_chars).min(total);

        if end < total {
            let window = &text[bounds[start]..bounds[end]];
            if let Some((pos, _)) = window.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
                let cut = window[..pos].chars().count();
                if cut > 0 {
                    end = start + cut;
                }
            }
        }

        let piece = text[bounds[start]..bounds[end]].trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }
        start = end;
    }

    chunks
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkPlan {
    pub max_chars: usize,
    pub total_chars: usize,
    pub chunks: Vec<ChunkInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkInfo {
    pub index: usize, // 0-based
    pub chars: usize,
    pub preview: String,
}

impl ChunkPlan {
    pub fn from_text(text: &str, max_chars: usize) -> ChunkPlan {
        let chunks = split_text(text, max_chars)
            .iter()
            .enumerate()
            .map(|(index, c)| ChunkInfo {
                index,
                chars: c.chars().count(),
                preview: c.chars().take(60).collect(),
            })
            .collect();

        ChunkPlan {
            max_chars: max_chars.max(1),
            total_chars: text.chars().count(),
            chunks,
        }
    }
}
