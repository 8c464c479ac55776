//! In-progress goals and their resolution rules.

use crate::cards::Email;
use crate::constants::{DEFAULT_MAX_FLAMES, EPIC_THREAD_FACTOR, FLAME_WAR_POINTS, FLAME_WAR_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Which win/burn predicates a goal is judged by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleOverride {
    /// Win on lights, burn on flames.
    #[default]
    Standard,
    /// Win once flames exceed the threshold; never burns.
    FlameWar { flame_threshold: u32 },
}

/// How a goal left the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Burned,
    Won,
}

/// A face-up objective collecting emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub group: String,
    pub flavor: String,
    pub num_lights: u32,
    pub max_flames: u32,
    pub points: u32,
    pub emails: Vec<Email>,
    pub rules: RuleOverride,
}

impl Goal {
    /// A fresh goal is worth as many points as lights it needs.
    #[must_use]
    pub fn new(group: impl Into<String>, num_lights: u32, flavor: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            flavor: flavor.into(),
            num_lights,
            max_flames: DEFAULT_MAX_FLAMES,
            points: num_lights,
            emails: Vec::new(),
            rules: RuleOverride::Standard,
        }
    }

    #[must_use]
    pub fn lights_count(&self) -> u32 {
        self.emails
            .iter()
            .filter(|email| email.is_read())
            .map(|email| email.lights)
            .sum()
    }

    #[must_use]
    pub fn flames_count(&self) -> u32 {
        self.emails
            .iter()
            .filter(|email| email.is_read())
            .map(|email| email.flames)
            .sum()
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        match self.rules {
            RuleOverride::Standard => self.lights_count() >= self.num_lights,
            RuleOverride::FlameWar { flame_threshold } => self.flames_count() > flame_threshold,
        }
    }

    #[must_use]
    pub fn is_burned(&self) -> bool {
        match self.rules {
            RuleOverride::Standard => self.flames_count() >= self.max_flames,
            RuleOverride::FlameWar { .. } => false,
        }
    }

    /// Burn is checked before win: a goal meeting both thresholds burns.
    #[must_use]
    pub fn resolution(&self) -> Option<Resolution> {
        if self.is_burned() {
            Some(Resolution::Burned)
        } else if self.is_won() {
            Some(Resolution::Won)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_flame_war(&self) -> bool {
        matches!(self.rules, RuleOverride::FlameWar { .. })
    }

    pub fn attach(&mut self, email: Email) {
        self.emails.push(email);
    }

    /// Detach every email, leaving the goal empty.
    pub fn take_emails(&mut self) -> Vec<Email> {
        std::mem::take(&mut self.emails)
    }

    /// Detach the first read email in attachment order.
    pub fn remove_first_read(&mut self) -> Option<Email> {
        let idx = self.emails.iter().position(Email::is_read)?;
        Some(self.emails.remove(idx))
    }

    pub fn unread_count(&self) -> usize {
        self.emails.iter().filter(|email| !email.is_read()).count()
    }

    pub fn apply_flame_war(&mut self) {
        self.rules = RuleOverride::FlameWar {
            flame_threshold: FLAME_WAR_THRESHOLD,
        };
        self.points = FLAME_WAR_POINTS;
    }

    pub fn apply_epic_thread(&mut self) {
        self.num_lights = self.num_lights.saturating_mul(EPIC_THREAD_FACTOR);
        self.max_flames = self.max_flames.saturating_mul(EPIC_THREAD_FACTOR);
        self.points = self.points.saturating_mul(EPIC_THREAD_FACTOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_email(lights: u32, flames: u32) -> Email {
        let mut email = Email::new(lights, flames, "test");
        email.mark_read();
        email
    }

    #[test]
    fn new_goal_is_worth_its_lights() {
        let goal = Goal::new("meetings", 3, "Cancel the standup");
        assert_eq!(goal.points, 3);
        assert_eq!(goal.max_flames, DEFAULT_MAX_FLAMES);
        assert_eq!(goal.resolution(), None);
    }

    #[test]
    fn only_read_emails_count() {
        let mut goal = Goal::new("g", 2, "f");
        goal.attach(Email::new(2, 3, "unread"));
        goal.attach(read_email(1, 1));
        assert_eq!(goal.lights_count(), 1);
        assert_eq!(goal.flames_count(), 1);
        assert_eq!(goal.unread_count(), 1);
        assert_eq!(goal.resolution(), None);
    }

    #[test]
    fn wins_at_threshold() {
        let mut goal = Goal::new("g", 2, "f");
        goal.attach(read_email(1, 0));
        assert!(!goal.is_won());
        goal.attach(read_email(1, 0));
        assert!(goal.is_won());
        assert_eq!(goal.resolution(), Some(Resolution::Won));
    }

    #[test]
    fn burn_beats_win_on_tie() {
        let mut goal = Goal::new("g", 2, "f");
        goal.attach(read_email(2, 3));
        assert!(goal.is_won());
        assert!(goal.is_burned());
        assert_eq!(goal.resolution(), Some(Resolution::Burned));
    }

    #[test]
    fn epic_thread_doubles_everything() {
        let mut goal = Goal::new("g", 2, "f");
        goal.apply_epic_thread();
        assert_eq!((goal.num_lights, goal.max_flames, goal.points), (4, 6, 4));
        goal.apply_epic_thread();
        assert_eq!((goal.num_lights, goal.max_flames, goal.points), (8, 12, 8));
    }

    #[test]
    fn flame_war_rewrites_predicates() {
        let mut goal = Goal::new("g", 1, "f");
        goal.apply_flame_war();
        assert!(goal.is_flame_war());
        assert_eq!(goal.points, FLAME_WAR_POINTS);

        goal.attach(read_email(5, 10));
        assert!(!goal.is_burned());
        assert!(!goal.is_won(), "lights no longer win and 10 flames is not over 10");

        goal.attach(read_email(0, 1));
        assert!(goal.is_won());
        assert_eq!(goal.resolution(), Some(Resolution::Won));
    }

    #[test]
    fn epic_thread_on_flame_war_keeps_override() {
        let mut goal = Goal::new("g", 2, "f");
        goal.apply_flame_war();
        goal.apply_epic_thread();
        assert_eq!(goal.points, FLAME_WAR_POINTS * 2);
        assert!(goal.is_flame_war());
    }

    #[test]
    fn remove_first_read_skips_unread() {
        let mut goal = Goal::new("g", 5, "f");
        goal.attach(Email::new(1, 0, "a"));
        goal.attach(read_email(2, 0));
        goal.attach(read_email(3, 0));
        let removed = goal.remove_first_read().unwrap();
        assert_eq!(removed.lights, 2);
        assert_eq!(goal.emails.len(), 2);

        let mut unread_only = Goal::new("g", 5, "f");
        unread_only.attach(Email::new(1, 0, "a"));
        assert!(unread_only.remove_first_read().is_none());
    }

    #[test]
    fn take_emails_empties_goal() {
        let mut goal = Goal::new("g", 5, "f");
        goal.attach(read_email(1, 0));
        goal.attach(Email::new(1, 0, "b"));
        let taken = goal.take_emails();
        assert_eq!(taken.len(), 2);
        assert!(goal.emails.is_empty());
    }
}
