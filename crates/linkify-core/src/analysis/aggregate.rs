//! Aggregate of streamed person-match fragments.

use std::collections::HashMap;

use super::model::PersonMatch;

/// Append-only mapping from persona-type key to person-match fragments in
/// delivery order.
///
/// Lives for exactly one analysis workflow: starting a new workflow resets
/// it to empty. Appending never fails and never reorders what was already
/// accumulated; fragments for persona types the analysis did not name are
/// retained too (the read view simply never projects them).
#[derive(Debug, Clone, Default)]
pub struct AggregateResultSet {
    matches: HashMap<String, Vec<PersonMatch>>,
}

impl AggregateResultSet {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one fragment under its persona type, creating the key if
    /// absent. A single atomic step per fragment; no suspension points.
    pub fn append(&mut self, persona_type: impl Into<String>, person: PersonMatch) {
        self.matches.entry(persona_type.into()).or_default().push(person);
    }

    /// All fragments accumulated for a persona type, in delivery order.
    pub fn matches_for(&self, persona_type: &str) -> &[PersonMatch] {
        self.matches
            .get(persona_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first accumulated fragment for a persona type, if any arrived.
    pub fn first_match(&self, persona_type: &str) -> Option<&PersonMatch> {
        self.matches_for(persona_type).first()
    }

    /// Total number of fragments across all persona types.
    pub fn fragment_count(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// True when no fragment has been folded in yet.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Resets the aggregate to empty for a new workflow.
    pub fn reset(&mut self) {
        self.matches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> PersonMatch {
        PersonMatch {
            name: name.to_string(),
            profile_url: format!("https://linkedin.com/in/{name}"),
            title: None,
            summary: None,
            image_url: None,
        }
    }

    #[test]
    fn test_append_preserves_delivery_order_per_key() {
        let mut aggregate = AggregateResultSet::new();
        aggregate.append("decision_maker", person("ann"));
        aggregate.append("champion", person("bob"));
        aggregate.append("decision_maker", person("cam"));

        let decision_makers = aggregate.matches_for("decision_maker");
        assert_eq!(decision_makers.len(), 2);
        assert_eq!(decision_makers[0].name, "ann");
        assert_eq!(decision_makers[1].name, "cam");
        assert_eq!(aggregate.matches_for("champion").len(), 1);
        assert_eq!(aggregate.fragment_count(), 3);
    }

    #[test]
    fn test_first_match_projection() {
        let mut aggregate = AggregateResultSet::new();
        assert!(aggregate.first_match("sponsor").is_none());

        aggregate.append("sponsor", person("dia"));
        aggregate.append("sponsor", person("eli"));
        assert_eq!(aggregate.first_match("sponsor").unwrap().name, "dia");
    }

    #[test]
    fn test_reset_empties_everything() {
        let mut aggregate = AggregateResultSet::new();
        aggregate.append("influencer", person("fox"));
        aggregate.reset();

        assert!(aggregate.is_empty());
        assert_eq!(aggregate.fragment_count(), 0);
        assert!(aggregate.matches_for("influencer").is_empty());
    }

    #[test]
    fn test_unknown_persona_types_are_retained() {
        let mut aggregate = AggregateResultSet::new();
        aggregate.append("new_type_nobody_asked_for", person("gus"));
        assert_eq!(aggregate.fragment_count(), 1);
    }
}
