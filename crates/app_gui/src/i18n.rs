//! Spanish/English UI strings.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Spanish,
    English,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguagePreference {
    System,
    Spanish,
    English,
}

impl LanguagePreference {
    pub fn resolve(self) -> Language {
        match self {
            LanguagePreference::Spanish => Language::Spanish,
            LanguagePreference::English => Language::English,
            LanguagePreference::System => {
                language_from_locale(sys_locale::get_locale().as_deref())
            }
        }
    }
}

/// Spanish unless the locale is explicitly English.
pub fn language_from_locale(locale: Option<&str>) -> Language {
    match locale {
        Some(tag) if tag.to_ascii_lowercase().starts_with("en") => Language::English,
        _ => Language::Spanish,
    }
}

impl Language {
    pub fn pick<'a>(self, es: &'a str, en: &'a str) -> &'a str {
        match self {
            Language::Spanish => es,
            Language::English => en,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("en-US"), Language::English)]
    #[case(Some("EN"), Language::English)]
    #[case(Some("es-PE"), Language::Spanish)]
    #[case(Some("nl-NL"), Language::Spanish)]
    #[case(None, Language::Spanish)]
    fn locale_maps_to_language(#[case] locale: Option<&str>, #[case] expected: Language) {
        assert_eq!(language_from_locale(locale), expected);
    }

    #[test]
    fn explicit_preference_wins() {
        assert_eq!(LanguagePreference::English.resolve(), Language::English);
        assert_eq!(
            Language::Spanish.pick("Especie", "Species"),
            "Especie"
        );
    }
}
