//! Job checklist - the four administrative milestones tracked per job

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::RoutingError;

/// Default assignee roster for checklist items
pub const DEFAULT_ROSTER: [&str; 4] = ["Paul tempsdniaser", "Bob", "Jacqueline", "Chuck Norris"];

/// Checklist milestone identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Confirmation,
    MaterialRequisition,
    Purchase,
    JobReleased,
}

impl Milestone {
    pub const ALL: [Milestone; 4] = [
        Milestone::Confirmation,
        Milestone::MaterialRequisition,
        Milestone::Purchase,
        Milestone::JobReleased,
    ];
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Milestone::Confirmation => write!(f, "Confirmation"),
            Milestone::MaterialRequisition => write!(f, "Material Requisition"),
            Milestone::Purchase => write!(f, "Purchase"),
            Milestone::JobReleased => write!(f, "Job Released"),
        }
    }
}

impl std::str::FromStr for Milestone {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match squashed.as_str() {
            "confirmation" => Ok(Milestone::Confirmation),
            "materialrequisition" => Ok(Milestone::MaterialRequisition),
            "purchase" => Ok(Milestone::Purchase),
            "jobreleased" => Ok(Milestone::JobReleased),
            _ => Err(RoutingError::UnknownChecklistItem(s.to_string())),
        }
    }
}

/// One milestone with its completion state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub milestone: Milestone,

    #[serde(default)]
    done: bool,

    /// Present iff `done`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_on: Option<NaiveDate>,

    #[serde(default = "default_assignee")]
    pub assignee: String,
}

fn default_assignee() -> String {
    DEFAULT_ROSTER[0].to_string()
}

impl ChecklistItem {
    pub fn pending(milestone: Milestone) -> Self {
        Self {
            milestone,
            done: false,
            completed_on: None,
            assignee: default_assignee(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn completed_on(&self) -> Option<NaiveDate> {
        self.completed_on
    }

    /// PENDING -> DONE stamps `today`; DONE -> PENDING clears the date
    fn toggle(&mut self, today: NaiveDate) {
        self.done = !self.done;
        self.completed_on = if self.done { Some(today) } else { None };
    }
}

/// Fixed set of checklist items, one per [`Milestone`], in milestone order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ChecklistItem>", into = "Vec<ChecklistItem>")]
pub struct Checklist {
    items: [ChecklistItem; 4],
}

impl Default for Checklist {
    fn default() -> Self {
        Self {
            items: Milestone::ALL.map(ChecklistItem::pending),
        }
    }
}

impl Checklist {
    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn item(&self, milestone: Milestone) -> &ChecklistItem {
        &self.items[Self::slot(milestone)]
    }

    fn slot(milestone: Milestone) -> usize {
        match milestone {
            Milestone::Confirmation => 0,
            Milestone::MaterialRequisition => 1,
            Milestone::Purchase => 2,
            Milestone::JobReleased => 3,
        }
    }

    /// Flip a milestone by name and return its new state
    pub fn toggle(&mut self, item_name: &str, today: NaiveDate) -> Result<&ChecklistItem, RoutingError> {
        let milestone: Milestone = item_name.parse()?;
        let item = &mut self.items[Self::slot(milestone)];
        item.toggle(today);
        tracing::debug!(%milestone, done = item.done, "checklist item toggled");
        Ok(item)
    }

    /// Set the assignee of a milestone; the name must be on the roster
    pub fn assign<S: AsRef<str>>(
        &mut self,
        item_name: &str,
        assignee: &str,
        roster: &[S],
    ) -> Result<(), RoutingError> {
        let milestone: Milestone = item_name.parse()?;
        let canonical = roster
            .iter()
            .map(AsRef::as_ref)
            .find(|name| name.eq_ignore_ascii_case(assignee.trim()))
            .ok_or_else(|| RoutingError::UnknownAssignee(assignee.to_string()))?;
        self.items[Self::slot(milestone)].assignee = canonical.to_string();
        Ok(())
    }

    /// Number of completed milestones
    pub fn completed(&self) -> usize {
        self.items.iter().filter(|i| i.done).count()
    }
}

impl From<Checklist> for Vec<ChecklistItem> {
    fn from(checklist: Checklist) -> Self {
        checklist.items.into()
    }
}

impl TryFrom<Vec<ChecklistItem>> for Checklist {
    type Error = String;

    fn try_from(stored: Vec<ChecklistItem>) -> Result<Self, Self::Error> {
        let mut checklist = Checklist::default();
        let mut seen = [false; 4];

        for item in stored {
            let slot = Self::slot(item.milestone);
            if seen[slot] {
                return Err(format!("checklist item '{}' appears twice", item.milestone));
            }
            if item.done != item.completed_on.is_some() {
                return Err(format!(
                    "checklist item '{}' must have a completion date exactly when done",
                    item.milestone
                ));
            }
            seen[slot] = true;
            checklist.items[slot] = item;
        }

        if let Some(missing) = Milestone::ALL.iter().find(|m| !seen[Self::slot(**m)]) {
            return Err(format!("checklist item '{}' is missing", missing));
        }
        Ok(checklist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_checklist_is_all_pending() {
        let checklist = Checklist::default();
        assert_eq!(checklist.items().len(), 4);
        for (item, milestone) in checklist.items().iter().zip(Milestone::ALL) {
            assert_eq!(item.milestone, milestone);
            assert!(!item.is_done());
            assert_eq!(item.completed_on(), None);
            assert_eq!(item.assignee, "Paul tempsdniaser");
        }
    }

    #[test]
    fn test_toggle_stamps_date() {
        let mut checklist = Checklist::default();
        let item = checklist.toggle("Purchase", date(2018, 4, 2)).unwrap();
        assert!(item.is_done());
        assert_eq!(item.completed_on(), Some(date(2018, 4, 2)));
        assert_eq!(checklist.completed(), 1);
    }

    #[test]
    fn test_toggle_round_trip_leaves_no_date() {
        let mut checklist = Checklist::default();
        checklist.toggle("Job Released", date(2018, 4, 2)).unwrap();
        let item = checklist.toggle("job_released", date(2018, 4, 3)).unwrap();
        assert!(!item.is_done());
        assert_eq!(item.completed_on(), None);
        assert_eq!(checklist, Checklist::default());
    }

    #[test]
    fn test_toggle_keeps_assignee() {
        let mut checklist = Checklist::default();
        checklist
            .assign("confirmation", "jacqueline", &DEFAULT_ROSTER)
            .unwrap();
        checklist.toggle("Confirmation", date(2018, 3, 4)).unwrap();
        assert_eq!(checklist.item(Milestone::Confirmation).assignee, "Jacqueline");
    }

    #[test]
    fn test_unknown_names() {
        let mut checklist = Checklist::default();
        assert_eq!(
            checklist.toggle("Shipping", date(2018, 3, 4)).unwrap_err(),
            RoutingError::UnknownChecklistItem("Shipping".to_string())
        );
        assert_eq!(
            checklist
                .assign("Purchase", "Alice", &DEFAULT_ROSTER)
                .unwrap_err(),
            RoutingError::UnknownAssignee("Alice".to_string())
        );
    }

    #[test]
    fn test_milestone_spellings() {
        assert_eq!(
            "material-requisition".parse::<Milestone>().unwrap(),
            Milestone::MaterialRequisition
        );
        assert_eq!(
            "Material Requisition".parse::<Milestone>().unwrap(),
            Milestone::MaterialRequisition
        );
        assert_eq!("JOB_RELEASED".parse::<Milestone>().unwrap(), Milestone::JobReleased);
    }

    #[test]
    fn test_yaml_roundtrip_preserves_state() {
        let mut checklist = Checklist::default();
        checklist.toggle("Purchase", date(2018, 4, 2)).unwrap();

        let yaml = serde_yml::to_string(&checklist).unwrap();
        assert!(yaml.contains("milestone: purchase"));
        assert!(yaml.contains("completed_on: 2018-04-02"));

        let parsed: Checklist = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, checklist);
    }

    #[test]
    fn test_partial_list_rejected() {
        let yaml = "- milestone: purchase\n  done: false\n  assignee: Bob\n";
        let err = serde_yml::from_str::<Checklist>(yaml).unwrap_err();
        assert!(err.to_string().contains("is missing"));
    }

    #[test]
    fn test_inconsistent_stored_state_rejected() {
        let done_without_date = "- milestone: purchase\n  done: true\n";
        assert!(serde_yml::from_str::<Checklist>(done_without_date).is_err());

        let date_without_done = "- milestone: purchase\n  completed_on: 2018-04-02\n";
        assert!(serde_yml::from_str::<Checklist>(date_without_done).is_err());

        let duplicated = "- milestone: purchase\n- milestone: purchase\n";
        assert!(serde_yml::from_str::<Checklist>(duplicated).is_err());
    }
}
