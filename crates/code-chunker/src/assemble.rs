use crate::language::Language;
use crate::types::{ChunkMetadata, ChunkRecord, ImportRecord, NodeChunk};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::Path;

/// Turn raw traversal output into final, ordered chunk records.
///
/// Ids follow `{language}_{kind}_{name}_{basename}_{seq}`; `seq` counts from
/// zero over the returned sequence, so ids stay unique when several chunks
/// share a name (including `anonymous`).
pub fn assemble(
    raw: Vec<NodeChunk>,
    imports: &[ImportRecord],
    file_path: &str,
    language: Language,
) -> Vec<ChunkRecord> {
    let mut seen_spans = HashSet::new();
    let mut chunks: Vec<NodeChunk> = raw
        .into_iter()
        .filter(|chunk| !chunk.content.trim().is_empty())
        .filter(|chunk| seen_spans.insert((chunk.start_byte, chunk.end_byte)))
        .collect();

    // Widest span first among equal starts; identical spans keep traversal order
    chunks.sort_by_key(|chunk| (chunk.line_start, Reverse(chunk.line_end)));
    let chunks = drop_contained(chunks, file_path);

    let basename = basename(file_path);
    chunks
        .into_iter()
        .enumerate()
        .map(|(seq, chunk)| ChunkRecord {
            id: format!(
                "{}_{}_{}_{}_{}",
                language.as_str(),
                chunk.chunk_type.as_str(),
                chunk.name,
                basename,
                seq
            ),
            content: chunk.content,
            metadata: ChunkMetadata {
                file_path: file_path.to_string(),
                language,
                chunk_type: chunk.chunk_type,
                name: chunk.name,
                line_start: chunk.line_start,
                line_end: chunk.line_end,
                imports: imports.to_vec(),
                details: chunk.details,
            },
        })
        .collect()
}

/// Remove chunks whose line span is a strict sub-range of another chunk's.
///
/// Expects chunks ordered by `(line_start, line_end desc)`. Pruning already
/// rules out nested chunk roots; this only triggers when several statements
/// share a line, e.g. `let a = 1; function f() {`. The dropped statement's
/// text is not part of any other chunk's content, so it is lost from the
/// output; that is logged at `warn`.
fn drop_contained(chunks: Vec<NodeChunk>, file_path: &str) -> Vec<NodeChunk> {
    let mut kept = Vec::with_capacity(chunks.len());
    // Span of the kept chunk reaching furthest down; earliest start on ties
    let mut widest: Option<(usize, usize)> = None;

    for chunk in chunks {
        let (start, end) = (chunk.line_start, chunk.line_end);
        let contained = widest.is_some_and(|(w_start, w_end)| {
            end < w_end || (end == w_end && w_start < start)
        });

        if contained {
            log::warn!(
                "Dropping {} `{}` in {file_path}: lines {start}-{end} lie inside another chunk",
                chunk.chunk_type.as_str(),
                chunk.name
            );
            continue;
        }

        if widest.map_or(true, |(_, w_end)| end > w_end) {
            widest = Some((start, end));
        }
        kept.push(chunk);
    }

    kept
}

fn basename(file_path: &str) -> &str {
    Path::new(file_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_path)
}
