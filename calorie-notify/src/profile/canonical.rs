//! Normalization of raw profile fields into display-ready form.

use tracing::debug;

use super::labels::{localize, Activity, Gender, Goal, Labelled, UnitSystem};
use crate::i18n::Catalog;
use crate::submission::ProfileFields;

/// Normalized, localized profile built once per submission.
///
/// Numeric fields are carried as the text that was submitted; nothing here is
/// parsed or validated numerically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalProfile {
    pub gender: String,
    pub goal: String,
    pub activity: String,
    pub age: String,
    pub unit_system: UnitSystem,
    pub height: String,
    pub weight: String,
}

impl CanonicalProfile {
    /// Build the profile. Total over all inputs.
    pub fn from_fields(fields: &ProfileFields, catalog: &Catalog) -> Self {
        let unit_system = UnitSystem::from_flag(&fields.metric_system);

        let (height, weight) = match unit_system {
            UnitSystem::Metric => (
                format!("{}{}", fields.height, catalog.tr("cm")),
                format!("{}{}", fields.weight, catalog.tr("kg")),
            ),
            UnitSystem::Imperial => (
                format!(
                    "{}{} {}{}",
                    fields.height,
                    catalog.tr("ft"),
                    fields.height2,
                    catalog.tr("in")
                ),
                format!("{}{}", fields.weight, catalog.tr("lbs")),
            ),
        };

        let profile = Self {
            gender: localize::<Gender>(&fields.gender, catalog),
            goal: localize::<Goal>(&fields.goal, catalog),
            activity: localize::<Activity>(&fields.activity, catalog),
            age: fields.age.clone(),
            unit_system,
            height,
            weight,
        };

        debug!(
            unit_system = profile.unit_system.as_str(),
            gender_recognised = Gender::from_raw(&fields.gender).is_some(),
            goal_recognised = Goal::from_raw(&fields.goal).is_some(),
            activity_recognised = Activity::from_raw(&fields.activity).is_some(),
            "profile_normalized"
        );

        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric_fields() -> ProfileFields {
        ProfileFields {
            metric_system: "true".to_string(),
            goal: "Weight Loss".to_string(),
            gender: "male".to_string(),
            age: "30".to_string(),
            height: "180".to_string(),
            height2: String::new(),
            weight: "80".to_string(),
            activity: "Moderate".to_string(),
        }
    }

    #[test]
    fn test_metric_profile() {
        let profile = CanonicalProfile::from_fields(&metric_fields(), &Catalog::identity());

        assert_eq!(profile.unit_system, UnitSystem::Metric);
        assert_eq!(profile.height, "180cm");
        assert_eq!(profile.weight, "80kg");
        assert_eq!(profile.gender, "Male");
        assert_eq!(profile.goal, "Weight Loss");
        assert_eq!(profile.activity, "Moderate");
        assert_eq!(profile.age, "30");
    }

    #[test]
    fn test_imperial_profile() {
        let fields = ProfileFields {
            metric_system: String::new(),
            height: "5".to_string(),
            height2: "11".to_string(),
            weight: "176".to_string(),
            ..metric_fields()
        };

        let profile = CanonicalProfile::from_fields(&fields, &Catalog::identity());

        assert_eq!(profile.unit_system, UnitSystem::Imperial);
        assert_eq!(profile.height, "5ft 11in");
        assert_eq!(profile.weight, "176lbs");
    }

    #[test]
    fn test_non_numeric_values_displayed_as_given() {
        let fields = ProfileFields {
            metric_system: "0".to_string(),
            height: "five".to_string(),
            height2: "".to_string(),
            weight: "a lot".to_string(),
            ..Default::default()
        };

        let profile = CanonicalProfile::from_fields(&fields, &Catalog::identity());

        assert_eq!(profile.height, "fiveft in");
        assert_eq!(profile.weight, "a lotlbs");
    }

    #[test]
    fn test_empty_fields_never_fail() {
        let profile = CanonicalProfile::from_fields(&ProfileFields::default(), &Catalog::identity());

        assert_eq!(profile.gender, "");
        assert_eq!(profile.goal, "");
        assert_eq!(profile.activity, "");
        assert_eq!(profile.height, "ft in");
        assert_eq!(profile.weight, "lbs");
    }

    #[test]
    fn test_localized_units_and_labels() {
        let catalog = Catalog::from_entries([
            ("cm", " см"),
            ("kg", " кг"),
            ("Male", "Мужской"),
            ("Moderate", "Умеренная"),
        ]);

        let profile = CanonicalProfile::from_fields(&metric_fields(), &catalog);

        assert_eq!(profile.height, "180 см");
        assert_eq!(profile.weight, "80 кг");
        assert_eq!(profile.gender, "Мужской");
        assert_eq!(profile.activity, "Умеренная");
        assert_eq!(profile.goal, "Weight Loss");
    }
}
