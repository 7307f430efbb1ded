use semchunk_code_chunker::{ChunkRecord, Chunker, ChunkerConfig};
use std::collections::HashSet;

const SAMPLES: &[(&str, &str)] = &[
    (
        "service.js",
        r#"import express from "express";
import { readFile } from "fs/promises";

const app = express();
let requests = 0;

function handler(req, res) {
  const inner = () => requests++;
  inner();
  res.send("ok");
}

class Cache {
  items = new Map();
  get(key) { return this.items.get(key); }
}

for (let i = 0; i < 3; i++) {
  console.log(i);
}

export default app;
"#,
    ),
    (
        "shapes.ts",
        r"import type { Vec } from './vec';

export interface Shape {
  area(): number;
}

export type Id = string | number;

enum Kind { Circle, Square }

abstract class Base implements Shape {
  abstract area(): number;
}

export const circle = (r: number): number => Math.PI * r * r;

declare function external(x: number): void;
",
    ),
    (
        "jobs.py",
        r#""""Background jobs."""
from __future__ import annotations
import logging

log = logging.getLogger(__name__)


@task(retries=3)
def send_email(to: str, body: str = "") -> bool:
    """Send one email."""
    def render():
        return body
    return bool(render())


class Worker:
    """Runs jobs."""

    def run(self):
        yield from range(3)


if __name__ == "__main__":
    Worker().run()
"#,
    ),
    (
        "Store.java",
        r"package app.store;

import java.util.Map;
import java.util.HashMap;

public class Store {
    private final Map<String, String> data = new HashMap<>();

    public String get(String key) {
        return data.get(key);
    }
}

enum Mode { READ, WRITE }
",
    ),
];

fn run(path: &str, code: &str) -> Vec<ChunkRecord> {
    Chunker::new(ChunkerConfig::default())
        .unwrap()
        .chunk_str(code, path)
        .unwrap_or_else(|e| panic!("{path}: {e}"))
}

#[test]
fn samples_produce_chunks() {
    for (path, code) in SAMPLES {
        assert!(!run(path, code).is_empty(), "{path} produced no chunks");
    }
}

#[test]
fn spans_never_nest() {
    for (path, code) in SAMPLES {
        let chunks = run(path, code);
        for a in &chunks {
            for b in &chunks {
                assert!(
                    !a.strictly_contains(b),
                    "{path}: {} ({}-{}) contains {} ({}-{})",
                    a.id,
                    a.metadata.line_start,
                    a.metadata.line_end,
                    b.id,
                    b.metadata.line_start,
                    b.metadata.line_end
                );
            }
        }
    }
}

#[test]
fn chunks_are_ordered_by_line_start() {
    for (path, code) in SAMPLES {
        let starts: Vec<_> = run(path, code)
            .iter()
            .map(|c| c.metadata.line_start)
            .collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted, "{path}");
    }
}

#[test]
fn ids_are_unique_per_file() {
    for (path, code) in SAMPLES {
        let chunks = run(path, code);
        let ids: HashSet<_> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), chunks.len(), "{path}");
    }
}

#[test]
fn chunking_is_idempotent() {
    for (path, code) in SAMPLES {
        assert_eq!(run(path, code), run(path, code), "{path}");
    }
}

#[test]
fn content_matches_source_lines() {
    for (path, code) in SAMPLES {
        let lines: Vec<_> = code.lines().collect();
        for chunk in run(path, code) {
            let first_line = lines[chunk.metadata.line_start - 1];
            let first_content_line = chunk.content.lines().next().unwrap_or_default();
            assert!(
                first_line.contains(first_content_line),
                "{path}: {} does not start on line {}",
                chunk.id,
                chunk.metadata.line_start
            );
            assert!(!chunk.content.trim().is_empty());
        }
    }
}

#[test]
fn imports_are_identical_across_a_file() {
    for (path, code) in SAMPLES {
        let chunks = run(path, code);
        let first = &chunks[0].metadata.imports;
        assert!(chunks.iter().all(|c| &c.metadata.imports == first), "{path}");
        let is_js_family = path.ends_with(".js") || path.ends_with(".ts");
        assert_eq!(!first.is_empty(), is_js_family, "{path}");
    }
}
