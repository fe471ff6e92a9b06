//! Closed label sets for the categorical profile fields.
//!
//! Each set maps a raw wire value to a catalog msgid. Unknown values are not an
//! error: [`localize`] hands them back unchanged.

use crate::i18n::Catalog;

/// A categorical field with a fixed set of recognised wire values.
pub trait Labelled: Sized + Copy + 'static {
    /// `(wire value, variant)` pairs, matched exactly.
    const TABLE: &'static [(&'static str, Self)];

    /// Catalog msgid for the display label.
    fn msgid(self) -> &'static str;

    fn from_raw(raw: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(wire, _)| *wire == raw)
            .map(|(_, variant)| *variant)
    }
}

/// Localized label for `raw`, or `raw` itself when it is not recognised.
pub fn localize<T: Labelled>(raw: &str, catalog: &Catalog) -> String {
    match T::from_raw(raw) {
        Some(variant) => catalog.tr(variant.msgid()).to_string(),
        None => raw.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    MaintainWeight,
    WeightLoss,
    ExtremeWeightLoss,
    WeightGain,
    FastWeightGain,
}

impl Labelled for Goal {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("Maintain Weight", Goal::MaintainWeight),
        ("Weight Loss", Goal::WeightLoss),
        ("Extreme Weight Loss", Goal::ExtremeWeightLoss),
        ("Weight Gain", Goal::WeightGain),
        ("Fast Weight Gain", Goal::FastWeightGain),
    ];

    fn msgid(self) -> &'static str {
        match self {
            Goal::MaintainWeight => "Maintain Weight",
            Goal::WeightLoss => "Weight Loss",
            Goal::ExtremeWeightLoss => "Extreme Weight Loss",
            Goal::WeightGain => "Weight Gain",
            Goal::FastWeightGain => "Fast Weight Gain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Labelled for Gender {
    const TABLE: &'static [(&'static str, Self)] =
        &[("male", Gender::Male), ("female", Gender::Female)];

    fn msgid(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
    ExtraActive,
}

impl Labelled for Activity {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("Sedentary", Activity::Sedentary),
        ("Light", Activity::Light),
        ("Moderate", Activity::Moderate),
        ("Active", Activity::Active),
        ("Very Active", Activity::VeryActive),
        ("Extra Active", Activity::ExtraActive),
    ];

    fn msgid(self) -> &'static str {
        match self {
            Activity::Sedentary => "Sedentary",
            Activity::Light => "Light",
            Activity::Moderate => "Moderate",
            Activity::Active => "Active",
            Activity::VeryActive => "Very Active",
            Activity::ExtraActive => "Extra Active",
        }
    }
}

/// Measurement system selected on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Interpret the loosely-typed `metric_system` flag.
    ///
    /// Blank, `0`, `false`, `off` and `no` (any case) select imperial.
    pub fn from_flag(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" | "off" | "no" => UnitSystem::Imperial,
            _ => UnitSystem::Metric,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Metric => "Metric",
            UnitSystem::Imperial => "Imperial",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_labels() {
        let catalog = Catalog::identity();
        for (wire, _) in Goal::TABLE {
            assert_eq!(localize::<Goal>(wire, &catalog), *wire);
        }
        assert_eq!(Goal::from_raw("Weight Loss"), Some(Goal::WeightLoss));
    }

    #[test]
    fn test_gender_is_case_sensitive() {
        assert_eq!(Gender::from_raw("male"), Some(Gender::Male));
        assert_eq!(Gender::from_raw("Male"), None);
    }

    #[test]
    fn test_localize_translates_known_value() {
        let catalog = Catalog::from_entries([("Female", "Weiblich"), ("Very Active", "Sehr aktiv")]);
        assert_eq!(localize::<Gender>("female", &catalog), "Weiblich");
        assert_eq!(localize::<Activity>("Very Active", &catalog), "Sehr aktiv");
    }

    #[test]
    fn test_localize_passes_unknown_through() {
        let catalog = Catalog::from_entries([("Male", "Männlich")]);
        for raw in ["", "other", "MALE", "Weight Loss\"", "\u{1F600}"] {
            assert_eq!(localize::<Gender>(raw, &catalog), raw);
            assert_eq!(localize::<Goal>(raw, &catalog), raw);
            assert_eq!(localize::<Activity>(raw, &catalog), raw);
        }
    }

    #[test]
    fn test_unit_system_from_flag() {
        assert_eq!(UnitSystem::from_flag("true"), UnitSystem::Metric);
        assert_eq!(UnitSystem::from_flag("1"), UnitSystem::Metric);
        assert_eq!(UnitSystem::from_flag("on"), UnitSystem::Metric);
        assert_eq!(UnitSystem::from_flag(""), UnitSystem::Imperial);
        assert_eq!(UnitSystem::from_flag("0"), UnitSystem::Imperial);
        assert_eq!(UnitSystem::from_flag(" False "), UnitSystem::Imperial);
        assert_eq!(UnitSystem::Metric.as_str(), "Metric");
        assert_eq!(UnitSystem::Imperial.as_str(), "Imperial");
    }
}
