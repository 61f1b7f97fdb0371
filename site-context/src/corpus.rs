//! Website content corpus: one trimmed, non-empty line per entry.

use std::path::Path;

use tracing::debug;

use crate::error::SiteContextError;

/// Ordered content lines loaded once per run and never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    lines: Vec<String>,
}

impl Corpus {
    /// Reads `path` as UTF-8 and normalizes it with [`Corpus::from_text`].
    ///
    /// The whole file is held in memory.
    ///
    /// # Errors
    /// [`SiteContextError::ContentLoad`] if the file is missing, unreadable,
    /// or not valid UTF-8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SiteContextError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SiteContextError::ContentLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let corpus = Self::from_text(&text);
        debug!(path = %path.display(), bytes = text.len(), lines = corpus.len(), "content file read");
        Ok(corpus)
    }

    /// Splits on `\n`, trims every line and drops the empty ones, keeping order.
    ///
    /// # Example
    /// ```
    /// use site_context::Corpus;
    /// let c = Corpus::from_text("  Hosting  \r\n\n\tSupport\n");
    /// assert_eq!(c.lines(), ["Hosting", "Support"]);
    /// ```
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First `n` lines (fewer if the corpus is shorter).
    pub fn head(&self, n: usize) -> &[String] {
        &self.lines[..n.min(self.lines.len())]
    }
}

impl<S: Into<String>> FromIterator<S> for Corpus {
    /// Builds a corpus from already-split lines, applying the same trim/drop rules.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let lines = iter
            .into_iter()
            .map(Into::into)
            .map(|l: String| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self { lines }
    }
}
