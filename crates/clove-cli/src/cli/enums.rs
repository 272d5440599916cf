use clap::ValueEnum;

/// Module syntax written for converted files.
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Style {
    /// `import` / `export default`
    #[value(name = "esm")]
    Esm,

    /// `require()` / `module.exports`
    #[value(name = "cjs", alias = "commonjs")]
    Cjs,
}

/// Diagnostic output format for `clove check`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per diagnostic
    #[default]
    #[value(name = "text")]
    Text,

    /// A single JSON document on stdout
    #[value(name = "json")]
    Json,
}
