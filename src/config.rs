use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};

pub const ROOT_FOLDER: &str = "quizzhtml";
pub const SCHOOL_YEAR: &str = "2025-26";
pub const DEFAULT_GRADES: [&str; 3] = ["5eme", "4eme", "3eme"];
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub root_folder: String,
    pub school_year: String,
    pub grades: Vec<String>,
    pub sequence_prefix: String,
    pub quiz_extension: String,
    pub port: u16,
    pub public_dir: String,
    // Directory the long-running server resolves everything against
    pub app_dir: PathBuf,
}

/// Where the process runs, which decides how the quiz folder is located.
#[derive(Debug, Clone)]
pub enum Deployment {
    LongRunning,
    // The function bundle lives one level below the project root
    Serverless { function_dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// `<root>/<year>`, the folder holding one directory per grade.
    pub quiz_base: PathBuf,
    /// Folder mounted under `/<root>` for the raw quiz files.
    pub static_root: PathBuf,
    pub public_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_folder: ROOT_FOLDER.to_string(),
            school_year: SCHOOL_YEAR.to_string(),
            grades: DEFAULT_GRADES.iter().map(|g| g.to_string()).collect(),
            sequence_prefix: "sequence".to_string(),
            quiz_extension: ".html".to_string(),
            port: DEFAULT_PORT,
            public_dir: "public".to_string(),
            app_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    // Loads the `.env` file if present, then applies QUIZZ_* overrides on top of the defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(root) = lookup("QUIZZ_ROOT_FOLDER") {
            config.root_folder = root;
        }
        if let Some(year) = lookup("QUIZZ_SCHOOL_YEAR") {
            config.school_year = year;
        }
        if let Some(grades) = lookup("QUIZZ_GRADES") {
            config.grades = grades
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(port) = lookup("QUIZZ_PORT") {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("QUIZZ_PORT is not a valid port: {}", port))?;
        }
        if let Some(public_dir) = lookup("QUIZZ_PUBLIC_DIR") {
            config.public_dir = public_dir;
        }
        if let Some(app_dir) = lookup("QUIZZ_APP_DIR") {
            config.app_dir = PathBuf::from(app_dir);
        }

        config.validate()?;
        Ok(config)
    }

    // The root folder becomes the `/<root>` mount, which cannot be empty.
    pub fn validate(&self) -> Result<()> {
        if self.root_folder.trim_matches('/').trim().is_empty() {
            bail!("QUIZZ_ROOT_FOLDER must not be empty");
        }
        Ok(())
    }

    pub fn resolve(&self, deployment: &Deployment) -> Result<Paths> {
        match deployment {
            Deployment::LongRunning => Ok(Paths {
                quiz_base: self.quiz_base_in(&self.app_dir),
                static_root: self.app_dir.join(&self.root_folder),
                public_dir: self.app_dir.join(&self.public_dir),
            }),
            Deployment::Serverless { function_dir } => {
                let cwd = std::env::current_dir().context("Failed to read the working directory")?;
                Ok(Paths {
                    quiz_base: self.quiz_base_in(&cwd),
                    static_root: function_dir.join("..").join(&self.root_folder),
                    public_dir: cwd.join(&self.public_dir),
                })
            }
        }
    }

    fn quiz_base_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.root_folder).join(&self.school_year)
    }

    // Link relative to the site root, matching the static mount.
    pub fn quiz_href(&self, grade: &str, sequence: &str, file: &str) -> String {
        format!("{}/{}/{}/{}/{}", self.root_folder, self.school_year, grade, sequence, file)
    }
}
