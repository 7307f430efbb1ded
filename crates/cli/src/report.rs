use semchunk_indexer::BatchOutput;

/// Human-readable batch summary (stderr; stdout is reserved for JSON)
pub fn render_summary(output: &BatchOutput) -> String {
    let mut text = String::new();

    for file in &output.files {
        let language = file.language.map_or("-", |l| l.as_str());
        text.push_str(&format!(
            "{:>4} chunks  {:<10}  {}\n",
            file.chunks.len(),
            language,
            file.file_path
        ));
    }

    let stats = &output.stats;
    text.push_str(&format!(
        "\n{} files chunked, {} skipped, {} failed: {} chunks from {} lines in {}ms\n",
        stats.files, stats.skipped, stats.failed, stats.chunks, stats.total_lines, stats.time_ms
    ));
    if !stats.languages.is_empty() {
        let languages: Vec<_> = stats
            .languages
            .iter()
            .map(|(lang, count)| format!("{lang}={count}"))
            .collect();
        text.push_str(&format!("languages: {}\n", languages.join(" ")));
    }
    for error in &stats.errors {
        text.push_str(&format!("error: {error}\n"));
    }

    text
}
