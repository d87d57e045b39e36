use std::str::FromStr;

use crate::error::GradeError;

/// Kind of data a task is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modality {
    /// Sound clips.
    Audio,
    /// Graphs of authors, papers and citations.
    Graph,
    /// Pictures and camera captures.
    Image,
    /// Mixed modalities.
    MultiModal,
    /// Rows of tabular features.
    Tabular,
    /// Natural language.
    Text,
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Graph => write!(f, "graph"),
            Self::Image => write!(f, "image"),
            Self::MultiModal => write!(f, "multimodal"),
            Self::Tabular => write!(f, "tabular"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl FromStr for Modality {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audio" => Ok(Self::Audio),
            "graph" => Ok(Self::Graph),
            "image" => Ok(Self::Image),
            "multimodal" => Ok(Self::MultiModal),
            "tabular" => Ok(Self::Tabular),
            "text" => Ok(Self::Text),
            _ => Err(GradeError::UnknownTask(s.to_string())),
        }
    }
}

/// Difficulty level of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    /// Easy level.
    Easy,
    /// Medium level.
    Medium,
    /// Hard level.
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(GradeError::UnknownTask(s.to_string())),
        }
    }
}

/// Every task that has a grader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Probability that a clip contains a whale call, scored with ROC AUC.
    AudioEasy,
    /// Clip label classification, scored with accuracy.
    AudioMedium,
    /// Bird species present in a recording, scored with the mean row F1.
    AudioHard,
    /// Scalar regression from pictures, scored with RMSE.
    ImageEasy,
    /// Iceberg versus ship probability, scored with the binary log-loss.
    ImageMedium,
    /// Camera poses, scored with the mean average accuracy of the aligned centers.
    ImageHard,
    /// Preference between two chat models, scored with the multiclass log-loss.
    TextMedium,
    /// Misconception retrieval, scored with MAP@25.
    TextHard,
    /// Taxi fare regression, scored with RMSE.
    TabularEasy,
    /// Binary class of a mushroom, scored with the Matthews correlation.
    TabularMedium,
    /// Per-base degradation rates, scored with the mean column-wise RMSE.
    TabularHard,
    /// Outlier papers in author profiles, scored with the weighted ROC AUC.
    GraphEasy,
    /// Source papers of a paper, scored with the mean average precision.
    GraphMedium,
    /// Papers answering a question, scored with the weighted MAP.
    GraphHard,
    /// Next item recommendation, scored with MRR@100.
    MultiModalMedium,
    /// Plant trait regression, scored with the mean clipped R².
    MultiModalHard,
}

impl Task {
    /// Every task, in modality then difficulty order.
    pub const ALL: [Task; 16] = [
        Task::AudioEasy,
        Task::AudioMedium,
        Task::AudioHard,
        Task::GraphEasy,
        Task::GraphMedium,
        Task::GraphHard,
        Task::ImageEasy,
        Task::ImageMedium,
        Task::ImageHard,
        Task::MultiModalMedium,
        Task::MultiModalHard,
        Task::TabularEasy,
        Task::TabularMedium,
        Task::TabularHard,
        Task::TextMedium,
        Task::TextHard,
    ];

    /// Look up the task of a modality at a difficulty level.
    pub fn new(modality: Modality, difficulty: Difficulty) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.modality() == modality && t.difficulty() == difficulty)
    }

    /// Modality of the task.
    pub fn modality(&self) -> Modality {
        match self {
            Self::AudioEasy | Self::AudioMedium | Self::AudioHard => Modality::Audio,
            Self::ImageEasy | Self::ImageMedium | Self::ImageHard => Modality::Image,
            Self::TextMedium | Self::TextHard => Modality::Text,
            Self::TabularEasy | Self::TabularMedium | Self::TabularHard => Modality::Tabular,
            Self::GraphEasy | Self::GraphMedium | Self::GraphHard => Modality::Graph,
            Self::MultiModalMedium | Self::MultiModalHard => Modality::MultiModal,
        }
    }

    /// Difficulty of the task.
    pub fn difficulty(&self) -> Difficulty {
        match self {
            Self::AudioEasy | Self::ImageEasy | Self::TabularEasy | Self::GraphEasy => {
                Difficulty::Easy
            }
            Self::AudioMedium
            | Self::ImageMedium
            | Self::TextMedium
            | Self::TabularMedium
            | Self::GraphMedium
            | Self::MultiModalMedium => Difficulty::Medium,
            Self::AudioHard
            | Self::ImageHard
            | Self::TextHard
            | Self::TabularHard
            | Self::GraphHard
            | Self::MultiModalHard => Difficulty::Hard,
        }
    }

    /// Name of the metric the task is scored with.
    pub fn metric(&self) -> &'static str {
        match self {
            Self::AudioEasy => "roc_auc",
            Self::AudioMedium => "accuracy",
            Self::AudioHard => "micro_f1",
            Self::ImageEasy | Self::TabularEasy => "rmse",
            Self::ImageMedium | Self::TextMedium => "log_loss",
            Self::ImageHard => "maa",
            Self::TextHard => "map@25",
            Self::TabularMedium => "mcc",
            Self::TabularHard => "mcrmse",
            Self::GraphEasy => "weighted_roc_auc",
            Self::GraphMedium | Self::GraphHard => "map",
            Self::MultiModalMedium => "mrr@100",
            Self::MultiModalHard => "mean_r2",
        }
    }

    /// Check if a larger score is better.
    pub fn higher_is_better(&self) -> bool {
        !matches!(
            self,
            Self::ImageEasy
                | Self::ImageMedium
                | Self::TextMedium
                | Self::TabularEasy
                | Self::TabularHard
        )
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.modality(), self.difficulty())
    }
}

impl FromStr for Task {
    type Err = GradeError;

    /// Parse a task name such as `image/hard` or `tabular-easy`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modality, difficulty) = s
            .split_once(&['/', '-', ':'][..])
            .ok_or_else(|| GradeError::UnknownTask(s.to_string()))?;

        let modality = modality.parse::<Modality>()?;
        let difficulty = difficulty.parse::<Difficulty>()?;

        Self::new(modality, difficulty).ok_or_else(|| GradeError::UnknownTask(s.to_string()))
    }
}

impl serde::Serialize for Task {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
