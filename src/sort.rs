use crate::models::Hit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    Title,
    Author,
    Comments,
    Points,
}

type SortFn = fn(Vec<Hit>) -> Vec<Hit>;

impl SortKey {
    /// Column order in the table header.
    pub const COLUMNS: [SortKey; 4] = [
        SortKey::Title,
        SortKey::Author,
        SortKey::Comments,
        SortKey::Points,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::None => "None",
            SortKey::Title => "Title",
            SortKey::Author => "Author",
            SortKey::Comments => "Comments",
            SortKey::Points => "Points",
        }
    }

    fn sorter(self) -> SortFn {
        match self {
            SortKey::None => identity,
            SortKey::Title => by_title,
            SortKey::Author => by_author,
            SortKey::Comments => by_comments,
            SortKey::Points => by_points,
        }
    }
}

fn identity(hits: Vec<Hit>) -> Vec<Hit> {
    hits
}

fn by_title(mut hits: Vec<Hit>) -> Vec<Hit> {
    hits.sort_by(|a, b| a.title.cmp(&b.title));
    hits
}

fn by_author(mut hits: Vec<Hit>) -> Vec<Hit> {
    hits.sort_by(|a, b| a.author.cmp(&b.author));
    hits
}

// Numeric columns sort ascending then flip, so equal values come out in
// reverse input order. A descending stable sort would not.
fn by_comments(mut hits: Vec<Hit>) -> Vec<Hit> {
    hits.sort_by_key(|hit| hit.num_comments);
    hits.reverse();
    hits
}

fn by_points(mut hits: Vec<Hit>) -> Vec<Hit> {
    hits.sort_by_key(|hit| hit.points);
    hits.reverse();
    hits
}

/// Display order for `hits`. The input is left untouched.
pub fn render(hits: &[Hit], key: SortKey, is_reverse: bool) -> Vec<Hit> {
    let mut sorted = key.sorter()(hits.to_vec());
    if is_reverse {
        sorted.reverse();
    }
    sorted
}

/// Active column and direction of the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub is_reverse: bool,
}

impl SortState {
    /// Clicking the active column again flips direction; a new column starts unreversed.
    pub fn select(&mut self, key: SortKey) {
        self.is_reverse = self.key == key && !self.is_reverse;
        self.key = key;
    }

    pub fn apply(&self, hits: &[Hit]) -> Vec<Hit> {
        render(hits, self.key, self.is_reverse)
    }
}
