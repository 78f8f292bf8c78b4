//! The fixed pool of messages sent for overdue books.

use crate::models::Book;
use rand::Rng;

const TITLE_PLACEHOLDER: &str = "{title}";

const TEMPLATES: [&str; 5] = [
    "その本、まだ読んでないんですか？時間の無駄ですね。",
    "積読ですか。残念ですね。その本は二度と読まれないでしょう。",
    "知識は鮮度が命。その本はもう腐っています。",
    "「{title}」を読むというタスクは、あなたの優先順位リストに存在しないようですね。",
    "あなたの本棚、もはや墓場ですね。未完の志が眠る場所。",
];

/// An ordered set of message templates, one of which names the book.
#[derive(Debug, Clone, Copy)]
pub struct InsultPool {
    templates: &'static [&'static str],
}

impl Default for InsultPool {
    fn default() -> Self {
        Self {
            templates: &TEMPLATES,
        }
    }
}

impl InsultPool {
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render template `index` for `book`.
    pub fn render(&self, index: usize, book: &Book) -> Option<String> {
        self.templates
            .get(index)
            .map(|template| template.replace(TITLE_PLACEHOLDER, &book.title))
    }

    /// Draw a template uniformly and render it for `book`.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R, book: &Book) -> String {
        let index = rng.random_range(0..self.templates.len());
        self.templates[index].replace(TITLE_PLACEHOLDER, &book.title)
    }
}
