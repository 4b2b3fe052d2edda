//! Surgical journey stage.
//!
//! The stage is never stored. It is recomputed from the patient's current relationship counts
//! and discharge flag every time it is asked for, so it cannot drift from the data. Advancing
//! the journey means attaching the next kind of record or setting the discharge flag; taking a
//! record away simply moves the stage back.

use crate::Patient;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four independent conditions of a completed journey.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyMilestones {
    /// An initial presentation exists.
    pub presented: bool,
    /// At least one procedure exists.
    pub operated: bool,
    /// At least one follow-up exists.
    pub monitored: bool,
    pub discharged: bool,
}

/// One of the four journey conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Presentation,
    Procedure,
    FollowUp,
    Discharge,
}

impl JourneyMilestones {
    pub fn of(patient: &Patient) -> Self {
        Self {
            presented: patient.presentation().is_some(),
            operated: !patient.procedures().is_empty(),
            monitored: !patient.follow_ups().is_empty(),
            discharged: patient.is_discharged(),
        }
    }

    pub fn all_met(self) -> bool {
        self.presented && self.operated && self.monitored && self.discharged
    }

    /// Unmet conditions, in journey order.
    pub fn missing(self) -> Vec<Milestone> {
        [
            (self.presented, Milestone::Presentation),
            (self.operated, Milestone::Procedure),
            (self.monitored, Milestone::FollowUp),
            (self.discharged, Milestone::Discharge),
        ]
        .into_iter()
        .filter(|(met, _)| !met)
        .map(|(_, milestone)| milestone)
        .collect()
    }
}

/// Position in the surgical journey.
///
/// The stage is the furthest point reached along presentation → procedure → follow-up →
/// discharge without skipping a step. `Completed` holds iff all four conditions hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JourneyStage {
    Registered,
    Presented,
    Operated,
    Monitored,
    Completed,
}

impl JourneyStage {
    pub fn from_milestones(m: JourneyMilestones) -> Self {
        if !m.presented {
            JourneyStage::Registered
        } else if !m.operated {
            JourneyStage::Presented
        } else if !m.monitored {
            JourneyStage::Operated
        } else if !m.discharged {
            JourneyStage::Monitored
        } else {
            JourneyStage::Completed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JourneyStage::Registered => "registered",
            JourneyStage::Presented => "presented",
            JourneyStage::Operated => "operated",
            JourneyStage::Monitored => "monitored",
            JourneyStage::Completed => "completed",
        }
    }

    /// What has to be recorded to reach the following stage.
    pub fn next_step(self) -> Option<&'static str> {
        match self {
            JourneyStage::Registered => Some("record the initial presentation"),
            JourneyStage::Presented => Some("record an operative procedure"),
            JourneyStage::Operated => Some("record a post-operative follow-up"),
            JourneyStage::Monitored => Some("discharge the patient"),
            JourneyStage::Completed => None,
        }
    }
}

impl fmt::Display for JourneyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Patient {
    pub fn journey_milestones(&self) -> JourneyMilestones {
        JourneyMilestones::of(self)
    }

    pub fn journey_stage(&self) -> JourneyStage {
        JourneyStage::from_milestones(self.journey_milestones())
    }

    pub fn is_journey_complete(&self) -> bool {
        self.journey_milestones().all_met()
    }
}
