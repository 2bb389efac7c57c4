//! Error types for report generation.

error_chain! {
    errors {
        FileNotFound(path: String) {
            description("input file not found")
            display("no such input file: {}", path)
        }
        Parse(source: String) {
            description("malformed delimited text")
            display("failed to parse csv from {}", source)
        }
        MissingColumn(column: String, source: String) {
            description("column referenced but not present")
            display("no column '{}' in {}", column, source)
        }
        NonNumeric(column: String, row: usize) {
            description("numeric column holds a non-numeric cell")
            display("column '{}' row {} is not numeric", column, row)
        }
        LengthMismatch(x: usize, y: usize) {
            description("x and y sequences differ in length")
            display("chart has {} x values but {} y values", x, y)
        }
        EmptySeries(title: String) {
            description("chart has no points")
            display("chart '{}' has no points", title)
        }
        Write(path: String) {
            description("output file not writable")
            display("cannot write {}", path)
        }
        Render(path: String, reason: String) {
            description("chart rendering failed")
            display("failed to render {}: {}", path, reason)
        }
        Setting(path: String) {
            description("invalid setting file")
            display("failed to load setting from {}", path)
        }
    }

    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
        Toml(::toml::de::Error);
    }
}
