use crate::models::book::{Book, Field};

/// Query string accepted by `GET /books`.
#[derive(Debug, Default)]
pub struct FilterParams {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl FilterParams {
    /// Folds raw query pairs; a repeated key keeps its last value and unknown
    /// keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "title" => &mut params.title,
                "author" => &mut params.author,
                "isbn" => &mut params.isbn,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }

    fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Author => self.author.as_deref(),
            Field::Isbn => self.isbn.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    TitlePrefix(String),
    AuthorEquals(String),
    IsbnEquals(String),
}

impl Criterion {
    pub fn for_field(field: Field, value: &str) -> Self {
        match field {
            Field::Title => Criterion::TitlePrefix(value.to_string()),
            Field::Author => Criterion::AuthorEquals(value.to_string()),
            Field::Isbn => Criterion::IsbnEquals(value.to_string()),
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Criterion::TitlePrefix(prefix) => book.title.starts_with(prefix.as_str()),
            Criterion::AuthorEquals(author) => book.author == *author,
            Criterion::IsbnEquals(isbn) => book.isbn == *isbn,
        }
    }
}

/// Conjunction of criteria; an empty filter matches every book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    criteria: Vec<Criterion>,
}

impl BookFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_params(params: &FilterParams) -> Self {
        let criteria = [Field::Title, Field::Isbn, Field::Author]
            .into_iter()
            .filter_map(|field| params.get(field).map(|value| Criterion::for_field(field, value)))
            .collect();

        Self { criteria }
    }

    pub fn with(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.criteria.iter().all(|criterion| criterion.matches(book))
    }
}

/// Anchored regular expression matching `prefix` literally.
pub fn title_prefix_pattern(prefix: &str) -> String {
    format!("^{}", regex::escape(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn book(title: &str, author: &str, isbn: &str) -> Book {
        Book {
            id: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
        }
    }

    #[test]
    fn empty_params_match_everything() {
        let filter = BookFilter::from_params(&FilterParams::default());
        assert!(filter.is_empty());
        assert!(filter.matches(&book("Atomic Habits", "James Clear", "0735211299")));
    }

    #[test]
    fn title_matches_by_case_sensitive_prefix() {
        let filter = BookFilter::all().with(Criterion::TitlePrefix("Th".to_string()));

        assert!(filter.matches(&book("The Power Of Habit", "Charles Duhigg", "081298160X")));
        assert!(!filter.matches(&book("Atomic Habits", "James Clear", "0735211299")));
        assert!(!filter.matches(&book("the lowercase one", "Anon", "1")));
        assert!(!filter.matches(&book("Of Th", "Anon", "2")));
    }

    #[test]
    fn criteria_combine_with_and() {
        let params = FilterParams {
            title: Some("The".to_string()),
            author: Some("Charles Duhigg".to_string()),
            isbn: None,
        };
        let filter = BookFilter::from_params(&params);

        assert_eq!(filter.criteria().len(), 2);
        assert!(filter.matches(&book("The Power Of Habit", "Charles Duhigg", "081298160X")));
        assert!(!filter.matches(&book("The Obstacle Is the Way", "Ryan Holiday", "1591846358")));
    }

    #[test]
    fn empty_author_matches_nothing_but_empty_title_matches_all() {
        let b = book("Atomic Habits", "James Clear", "0735211299");

        let by_title = BookFilter::all().with(Criterion::for_field(Field::Title, ""));
        let by_author = BookFilter::all().with(Criterion::for_field(Field::Author, ""));

        assert!(by_title.matches(&b));
        assert!(!by_author.matches(&b));
    }

    #[test]
    fn repeated_query_keys_keep_the_last_value() {
        let params = FilterParams::from_pairs([
            ("title".to_string(), "A".to_string()),
            ("page".to_string(), "2".to_string()),
            ("title".to_string(), "B".to_string()),
        ]);

        assert_eq!(params.title.as_deref(), Some("B"));
        assert_eq!(params.author, None);
        assert_eq!(
            BookFilter::from_params(&params).criteria(),
            [Criterion::TitlePrefix("B".to_string())]
        );
    }

    #[test]
    fn prefix_pattern_escapes_metacharacters() {
        let pattern = Regex::new(&title_prefix_pattern("C++ (2nd.")).unwrap();

        assert!(pattern.is_match("C++ (2nd. edition)"));
        assert!(!pattern.is_match("CC (2nd! edition)"));
        assert!(!pattern.is_match("Learning C++ (2nd."));
    }
}
