use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub href: String,
    // 1-based position inside its sequence, only used for "Quiz N°x" labels
    pub index: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub name: String,
    pub title: String,
    pub number: u64,
    pub quizzes: Vec<Quiz>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GradeLevel {
    pub name: String,
    pub sequences: Vec<Sequence>,
}

/// Grades in configured order, each with its non-empty sequences.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Taxonomy {
    pub grades: Vec<GradeLevel>,
}

impl Taxonomy {
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    pub fn get(&self, grade: &str) -> Option<&GradeLevel> {
        self.grades.iter().find(|g| g.name == grade)
    }

    pub fn quiz_count(&self) -> usize {
        self.grades
            .iter()
            .flat_map(|g| &g.sequences)
            .map(|s| s.quizzes.len())
            .sum()
    }
}
