use std::fs::{self, DirEntry};
use std::path::Path;
use anyhow::{Context, Result};
use log::{error, warn};
use regex::Regex;
use crate::config::Config;
use crate::models::{GradeLevel, Quiz, Sequence, Taxonomy};

// Walks `<base>/<grade>/<prefix><N>/<name><ext>` and builds the taxonomy shown on the index page.
pub struct TaxonomyScanner {
    config: Config,
    number: Regex,
}

impl TaxonomyScanner {
    pub fn new(config: Config) -> Result<Self> {
        let number = Regex::new(r"[0-9]+").context("Failed to compile the sequence number pattern")?;
        Ok(Self { config, number })
    }

    // A missing base folder is not fatal: it is logged and the taxonomy comes back empty.
    pub fn scan(&self, base: &Path) -> Result<Taxonomy> {
        let mut taxonomy = Taxonomy::default();

        if !base.exists() {
            error!("Quiz base path does not exist: {}", base.display());
            return Ok(taxonomy);
        }

        for grade in &self.config.grades {
            let grade_path = base.join(grade);
            if !grade_path.exists() {
                continue;
            }

            let sequences = self.scan_grade(grade, &grade_path)?;
            if !sequences.is_empty() {
                taxonomy.grades.push(GradeLevel { name: grade.clone(), sequences });
            }
        }

        Ok(taxonomy)
    }

    fn scan_grade(&self, grade: &str, grade_path: &Path) -> Result<Vec<Sequence>> {
        let mut dirs = Vec::new();
        for entry in sorted_entries(grade_path)? {
            let Some(name) = entry_name(&entry) else { continue };
            if !name.starts_with(&self.config.sequence_prefix) {
                continue;
            }
            // file_type() does not follow symlinks
            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to stat {}", entry.path().display()))?;
            if file_type.is_dir() {
                dirs.push(name);
            }
        }

        // sort_by_key is stable, so equal numbers keep their listing order
        dirs.sort_by_key(|name| self.sequence_number(name));

        let mut sequences = Vec::new();
        for name in dirs {
            let quizzes = self.scan_sequence(grade, &name, &grade_path.join(&name))?;
            if quizzes.is_empty() {
                continue;
            }
            sequences.push(Sequence {
                title: format!("Séquence {}", name.replacen(&self.config.sequence_prefix, "", 1)),
                number: self.sequence_number(&name),
                name,
                quizzes,
            });
        }

        Ok(sequences)
    }

    fn scan_sequence(&self, grade: &str, sequence: &str, path: &Path) -> Result<Vec<Quiz>> {
        let mut quizzes = Vec::new();
        for entry in sorted_entries(path)? {
            let Some(file) = entry_name(&entry) else { continue };
            if !file.ends_with(&self.config.quiz_extension) {
                continue;
            }
            let is_dir = entry
                .file_type()
                .with_context(|| format!("Failed to stat {}", entry.path().display()))?
                .is_dir();
            if is_dir {
                continue;
            }

            let id = file_stem(&file).to_string();
            quizzes.push(Quiz {
                title: format!("Quiz {}", id),
                href: self.config.quiz_href(grade, sequence, &file),
                index: quizzes.len() + 1,
                id,
            });
        }
        Ok(quizzes)
    }

    // First run of digits in the folder name, 0 when there is none or it overflows.
    pub fn sequence_number(&self, name: &str) -> u64 {
        self.number
            .find(name)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    }
}

// Directory listing in byte-wise name order, which keeps quiz numbering stable across filesystems.
fn sorted_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list directory {}", dir.display()))?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

fn entry_name(entry: &DirEntry) -> Option<String> {
    match entry.file_name().into_string() {
        Ok(name) => Some(name),
        Err(raw) => {
            warn!("Skipping non UTF-8 entry {:?}", raw);
            None
        }
    }
}

// Strips the last extension only, "a.b.html" -> "a.b"; dotfiles keep their name.
fn file_stem(file: &str) -> &str {
    match file.rfind('.') {
        Some(0) | None => file,
        Some(pos) => &file[..pos],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<html></html>").unwrap();
    }

    fn scanner() -> TaxonomyScanner {
        TaxonomyScanner::new(Config::default()).unwrap()
    }

    #[test]
    fn sequences_are_sorted_by_number_and_quizzes_restart_at_one() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "5eme/sequence2/a.html");
        touch(dir.path(), "5eme/sequence2/b.html");
        touch(dir.path(), "5eme/sequence1/c.html");

        let taxonomy = scanner().scan(dir.path()).unwrap();
        let grade = taxonomy.get("5eme").unwrap();

        let names: Vec<_> = grade.sequences.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["sequence1", "sequence2"]);

        let first = &grade.sequences[0];
        assert_eq!(first.title, "Séquence 1");
        assert_eq!(first.quizzes.len(), 1);
        assert_eq!(first.quizzes[0].index, 1);
        assert_eq!(first.quizzes[0].id, "c");
        assert_eq!(first.quizzes[0].title, "Quiz c");
        assert_eq!(first.quizzes[0].href, "quizzhtml/2025-26/5eme/sequence1/c.html");

        let indexes: Vec<_> = grade.sequences[1].quizzes.iter().map(|q| q.index).collect();
        assert_eq!(indexes, vec![1, 2]);
    }

    #[test]
    fn numeric_order_beats_lexical_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "4eme/sequence10/q.html");
        touch(dir.path(), "4eme/sequence9/q.html");
        touch(dir.path(), "4eme/sequence1/q.html");

        let taxonomy = scanner().scan(dir.path()).unwrap();
        let numbers: Vec<_> = taxonomy.get("4eme").unwrap().sequences.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 9, 10]);
    }

    #[test]
    fn unnumbered_sequences_sort_first() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "3eme/sequence3/q.html");
        touch(dir.path(), "3eme/sequence-bonus/q.html");

        let taxonomy = scanner().scan(dir.path()).unwrap();
        let grade = taxonomy.get("3eme").unwrap();
        assert_eq!(grade.sequences[0].name, "sequence-bonus");
        assert_eq!(grade.sequences[0].number, 0);
        assert_eq!(grade.sequences[0].title, "Séquence -bonus");
    }

    #[test]
    fn empty_sequences_and_grades_are_dropped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "5eme/sequence1/q.html");
        fs::create_dir_all(dir.path().join("5eme/sequence2")).unwrap();
        touch(dir.path(), "5eme/sequence3/notes.txt");
        fs::create_dir_all(dir.path().join("4eme/sequence1")).unwrap();

        let taxonomy = scanner().scan(dir.path()).unwrap();
        assert_eq!(taxonomy.grades.len(), 1);
        assert_eq!(taxonomy.get("5eme").unwrap().sequences.len(), 1);
        assert!(taxonomy.get("4eme").is_none());
    }

    #[test]
    fn ignores_unprefixed_folders_and_plain_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "5eme/brouillons/q.html");
        touch(dir.path(), "5eme/sequence4.html");
        touch(dir.path(), "5eme/sequence4/q.html");
        fs::create_dir_all(dir.path().join("5eme/sequence4/nested.html")).unwrap();

        let taxonomy = scanner().scan(dir.path()).unwrap();
        let grade = taxonomy.get("5eme").unwrap();
        assert_eq!(grade.sequences.len(), 1);
        assert_eq!(grade.sequences[0].quizzes.len(), 1);
    }

    #[test]
    fn grades_follow_configured_order_and_unknown_grades_are_ignored() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "3eme/sequence1/q.html");
        touch(dir.path(), "5eme/sequence1/q.html");
        touch(dir.path(), "6eme/sequence1/q.html");

        let taxonomy = scanner().scan(dir.path()).unwrap();
        let names: Vec<_> = taxonomy.grades.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["5eme", "3eme"]);
        assert_eq!(taxonomy.quiz_count(), 2);
    }

    #[test]
    fn missing_base_yields_empty_taxonomy() {
        let dir = TempDir::new().unwrap();
        let taxonomy = scanner().scan(&dir.path().join("absent")).unwrap();
        assert!(taxonomy.is_empty());
    }

    #[test]
    fn sequence_number_uses_first_digit_run() {
        let scanner = scanner();
        assert_eq!(scanner.sequence_number("sequence12"), 12);
        assert_eq!(scanner.sequence_number("sequence3b4"), 3);
        assert_eq!(scanner.sequence_number("sequence\u{0661}2"), 2);
        assert_eq!(scanner.sequence_number("sequence"), 0);
        assert_eq!(scanner.sequence_number("sequence99999999999999999999999"), 0);
    }

    #[test]
    fn stem_drops_only_the_last_extension() {
        assert_eq!(file_stem("a.b.html"), "a.b");
        assert_eq!(file_stem(".html"), ".html");
        assert_eq!(file_stem("quiz"), "quiz");
    }

    #[test]
    fn equal_numbers_keep_byte_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "5eme/sequence1/a.html");
        touch(dir.path(), "5eme/sequence01/z.html");

        let taxonomy = scanner().scan(dir.path()).unwrap();
        let names: Vec<_> = taxonomy.get("5eme").unwrap().sequences.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["sequence01", "sequence1"]);
    }

    #[test]
    fn quiz_indexes_follow_file_name_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "5eme/sequence1/b.html");
        touch(dir.path(), "5eme/sequence1/a.html");

        let taxonomy = scanner().scan(dir.path()).unwrap();
        let quizzes: Vec<_> = taxonomy.get("5eme").unwrap().sequences[0]
            .quizzes
            .iter()
            .map(|q| (q.id.as_str(), q.index))
            .collect();
        assert_eq!(quizzes, vec![("a", 1), ("b", 2)]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_sequence_folders_are_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "shared/q.html");
        touch(dir.path(), "5eme/sequence1/q.html");
        std::os::unix::fs::symlink(dir.path().join("shared"), dir.path().join("5eme/sequence5")).unwrap();

        let taxonomy = scanner().scan(dir.path()).unwrap();
        let names: Vec<_> = taxonomy.get("5eme").unwrap().sequences.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["sequence1"]);
    }
}
