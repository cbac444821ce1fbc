//! Нормализация сырого результата по таблице алиасов.
//!
//! По умолчанию — тождество: текст и тег символики проходят как есть.
//! Единственное правило из коробки: EAN-13 с ведущим `0` отдаётся как UPC-E
//! без этого нуля (то же самое напечатанное значение, одно представление для хоста).

use log::trace;
use serde::{Deserialize, Serialize};

use crate::core::types::{Detection, NormalizedResult, Symbology};

/// Одно правило переписывания: `from` + префикс текста → `to`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AliasRule {
    pub from: Symbology,
    /// Пустой префикс — правило срабатывает на любой текст символики `from`.
    #[serde(default)]
    pub text_prefix: String,
    /// Отрезать ли префикс от текста.
    #[serde(default)]
    pub strip_prefix: bool,
    pub to: Symbology,
}

impl AliasRule {
    /// EAN-13 с ведущим нулём → UPC-E.
    #[must_use]
    pub fn ean13_leading_zero_as_upce() -> Self {
        Self {
            from: Symbology::Ean13,
            text_prefix: "0".to_owned(),
            strip_prefix: true,
            to: Symbology::Upce,
        }
    }

    fn apply(&self, d: &Detection) -> Option<NormalizedResult> {
        if d.symbology != self.from {
            return None;
        }
        let rest = d.text.strip_prefix(self.text_prefix.as_str())?;
        let text = if self.strip_prefix { rest } else { d.text.as_str() };
        Some(NormalizedResult::new(text, self.to.tag()))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultNormalizer {
    rules: Vec<AliasRule>,
}

impl ResultNormalizer {
    /// Без правил: всё проходит без изменений.
    #[must_use]
    pub fn identity() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn from_rules(rules: impl IntoIterator<Item = AliasRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: AliasRule) -> Self {
        self.rules.push(rule);
        self
    }

    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[AliasRule] {
        &self.rules
    }

    /// Срабатывает первое подходящее правило; иначе — тождество.
    #[must_use]
    pub fn normalize(&self, d: &Detection) -> NormalizedResult {
        for rule in &self.rules {
            if let Some(res) = rule.apply(d) {
                trace!("alias {} -> {} for {:?}", rule.from, rule.to, d.text);
                return res;
            }
        }
        NormalizedResult::new(d.text.clone(), d.symbology.tag())
    }
}

impl Default for ResultNormalizer {
    fn default() -> Self {
        Self::from_rules([AliasRule::ean13_leading_zero_as_upce()])
    }
}
