//! Белый список символик.
//!
//! Набор фиксируется при создании и дальше не меняется; проверка — один бит.

use crate::core::types::{Detection, Symbology};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CodeTypeFilter {
    mask: u16,
}

impl CodeTypeFilter {
    /// Фильтр ровно по переданным символикам (повторы допустимы).
    #[must_use]
    pub fn new(symbologies: impl IntoIterator<Item = Symbology>) -> Self {
        let mask = symbologies.into_iter().fold(0u16, |m, s| m | s.bit());
        Self { mask }
    }

    /// Все символики, которые понимает ридер.
    #[must_use]
    pub fn all() -> Self {
        Self::new(Symbology::ALL)
    }

    #[inline]
    #[must_use]
    pub fn accepts(&self, symbology: Symbology) -> bool {
        self.mask & symbology.bit() != 0
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Символики набора в порядке дискриминантов.
    #[must_use]
    pub fn symbologies(&self) -> impl Iterator<Item = Symbology> + '_ {
        Symbology::ALL.into_iter().filter(|s| self.accepts(*s))
    }

    /// Первая детекция батча, прошедшая фильтр. Порядок — как у детектора,
    /// приоритетов по символике нет.
    #[must_use]
    pub fn first_accepted<'a>(&self, batch: &'a [Detection]) -> Option<&'a Detection> {
        batch.iter().find(|d| self.accepts(d.symbology))
    }
}

impl Default for CodeTypeFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Symbology> for CodeTypeFilter {
    fn from_iter<I: IntoIterator<Item = Symbology>>(iter: I) -> Self {
        Self::new(iter)
    }
}
