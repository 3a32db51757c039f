use serde::Serialize;
use strum::Display;

use crate::domain::{EntityId, Student};

pub const MIN_NORMAL_CREDITS: u32 = 12;
pub const MAX_NORMAL_CREDITS: u32 = 20;

/// Student credit-load band. Used for reporting only, never blocks a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CreditLoad {
    UnderLoaded,
    Normal,
    OverLoaded,
}

impl CreditLoad {
    pub fn classify(total_credits: u32) -> Self {
        if total_credits < MIN_NORMAL_CREDITS {
            CreditLoad::UnderLoaded
        } else if total_credits <= MAX_NORMAL_CREDITS {
            CreditLoad::Normal
        } else {
            CreditLoad::OverLoaded
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditStatus {
    pub student_id: EntityId,
    pub roll_no: String,
    pub total_credits: u32,
    pub band: CreditLoad,
}

pub fn credit_report(students: &[Student]) -> Vec<CreditStatus> {
    students
        .iter()
        .map(|s| CreditStatus {
            student_id: s.id.clone(),
            roll_no: s.roll_no.clone(),
            total_credits: s.total_credits,
            band: CreditLoad::classify(s.total_credits),
        })
        .collect()
}
