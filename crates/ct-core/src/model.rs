use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Higher is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Pending,
    Visited,
    Missed,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Hindi,
    English,
    Telugu,
    Tamil,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hindi => "hindi",
            Language::English => "english",
            Language::Telugu => "telugu",
            Language::Tamil => "tamil",
        }
    }
}

/// Voice agent roster offered by the campaign form.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Agent {
    Hindi,
    English,
    Telugu,
    Tamil,
}

impl Agent {
    pub fn display_name(&self) -> &'static str {
        match self {
            Agent::Hindi => "Priya - Hindi Agent",
            Agent::English => "Sarah - English Agent",
            Agent::Telugu => "Ravi - Telugu Agent",
            Agent::Tamil => "Meera - Tamil Agent",
        }
    }

    pub fn language(&self) -> Language {
        match self {
            Agent::Hindi => Language::Hindi,
            Agent::English => Language::English,
            Agent::Telugu => Language::Telugu,
            Agent::Tamil => Language::Tamil,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrunkProvider {
    Plivo,
    Twilio,
    Exotel,
}

impl TrunkProvider {
    /// Calls per second the provider accepts.
    pub fn cps(&self) -> u32 {
        match self {
            TrunkProvider::Plivo => 2,
            TrunkProvider::Twilio => 5,
            TrunkProvider::Exotel => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrunkProvider::Plivo => "Plivo",
            TrunkProvider::Twilio => "Twilio",
            TrunkProvider::Exotel => "Exotel",
        }
    }
}

/// Order in which selected outlets are dialed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Prioritization {
    Value,
    Priority,
    TimeWindow,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Stage a simulated call sits in. A call is counted in exactly one bucket.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Initiated,
    Ringing,
    Live,
    Completed,
    Failed,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Initiated,
        Bucket::Ringing,
        Bucket::Live,
        Bucket::Completed,
        Bucket::Failed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Initiated => "Initiated",
            Bucket::Ringing => "Ringing",
            Bucket::Live => "Live",
            Bucket::Completed => "Completed",
            Bucket::Failed => "Failed",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimState {
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
    Completed,
}

impl SimState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SimState::Stopped | SimState::Completed)
    }

    /// Running or paused: a campaign exists and can still be stopped.
    pub fn is_active(&self) -> bool {
        matches!(self, SimState::Running | SimState::Paused)
    }
}
