// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

const DEFAULT_LANG: &str = "en";

// Dicionários embutidos no binário
const DICTIONARIES: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
    ("fr", include_str!("../../locales/fr.json")),
];

/// Traduções das mensagens de erro, indexadas por idioma e depois por chave.
#[derive(Clone, Debug)]
pub struct I18nStore {
    dictionaries: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn load() -> Self {
        let mut dictionaries = HashMap::new();
        for (lang, raw) in DICTIONARIES {
            match serde_json::from_str::<HashMap<String, String>>(raw) {
                Ok(dict) => {
                    dictionaries.insert(lang.to_string(), dict);
                }
                Err(e) => tracing::warn!("⚠️ Dicionário '{}' inválido, ignorado: {}", lang, e),
            }
        }
        Self { dictionaries: Arc::new(dictionaries) }
    }

    /// Idioma pedido -> inglês -> a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .unwrap_or(key)
            .to_string()
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.dictionaries
            .get(lang)
            .and_then(|dict| dict.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_embedded_dictionary_parses() {
        let store = I18nStore::load();
        assert_eq!(store.dictionaries.len(), DICTIONARIES.len());
    }

    #[test]
    fn translates_to_requested_language() {
        let store = I18nStore::load();
        assert_eq!(store.translate("pt", "errors.user_not_found"), "Usuário não encontrado.");
        assert_eq!(store.translate("fr", "errors.user_not_found"), "Utilisateur introuvable.");
    }

    #[test]
    fn falls_back_to_english_then_key() {
        let store = I18nStore::load();
        assert_eq!(store.translate("de", "errors.user_not_found"), "User not found.");
        assert_eq!(store.translate("pt", "custom.unknown"), "custom.unknown");
    }
}
