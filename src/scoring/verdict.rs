use super::record::ScoredRecord;

/// Simulator outcome band for a championship probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Above 80%
    DominantChampion,
    /// Above 50%
    StrongContender,
    /// Above 20%
    Midfield,
    NoChance,
}

impl Outcome {
    pub fn from_probability(probability: f64) -> Self {
        let pct = probability * 100.0;
        if pct > 80.0 {
            Outcome::DominantChampion
        } else if pct > 50.0 {
            Outcome::StrongContender
        } else if pct > 20.0 {
            Outcome::Midfield
        } else {
            Outcome::NoChance
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Outcome::DominantChampion => "DOMINANT CHAMPION",
            Outcome::StrongContender => "STRONG CONTENDER",
            Outcome::Midfield => "MIDFIELD",
            Outcome::NoChance => "NO CHANCE",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Outcome::DominantChampion => "These stats all but guarantee a title.",
            Outcome::StrongContender => "A very close fight for the title.",
            Outcome::Midfield => "Good season, but not championship material.",
            Outcome::NoChance => "Needs significantly better results.",
        }
    }
}

/// Who leads a head-to-head on unrounded probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadToHead {
    First,
    Second,
    DeadHeat,
}

pub fn head_to_head(a: &ScoredRecord, b: &ScoredRecord) -> HeadToHead {
    if a.win_probability > b.win_probability {
        HeadToHead::First
    } else if b.win_probability > a.win_probability {
        HeadToHead::Second
    } else {
        HeadToHead::DeadHeat
    }
}
