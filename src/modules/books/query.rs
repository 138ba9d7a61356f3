//! Search, filter, sort and paginate a book collection.

use std::cmp::Ordering;
use std::str::FromStr;

use super::models::{Book, Page};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Raw query string of `GET /books`; every value is kept as text so bad
/// numbers fall back to defaults instead of failing the request.
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub is_available: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl BookQuery {
    /// Collect decoded `key=value` pairs. The first occurrence of a key
    /// wins and unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search" => &mut query.search,
                "genre" => &mut query.genre,
                "isAvailable" => &mut query.is_available,
                "sortBy" => &mut query.sort_by,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Book fields usable as a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Author,
    Genre,
    PublishedYear,
    AvailableCopies,
    IsAvailable,
    CreatedAt,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "title" => Ok(SortField::Title),
            "author" => Ok(SortField::Author),
            "genre" => Ok(SortField::Genre),
            "publishedYear" => Ok(SortField::PublishedYear),
            "availableCopies" => Ok(SortField::AvailableCopies),
            "isAvailable" => Ok(SortField::IsAvailable),
            "createdAt" => Ok(SortField::CreatedAt),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

impl SortField {
    fn compare(self, a: &Book, b: &Book) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Author => a.author.cmp(&b.author),
            SortField::Genre => a.genre.cmp(&b.genre),
            SortField::PublishedYear => a.published_year.cmp(&b.published_year),
            SortField::AvailableCopies => a.available_copies.cmp(&b.available_copies),
            SortField::IsAvailable => a.is_available.cmp(&b.is_available),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

/// Typed list options with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Lowercased needle matched against title or author
    pub search: Option<String>,
    /// Lowercased genre for exact matching
    pub genre: Option<String>,
    pub is_available: Option<bool>,
    pub sort_by: Option<SortField>,
    /// 1-based; values below 1 select nothing
    pub page: i64,
    /// Always positive
    pub limit: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            search: None,
            genre: None,
            is_available: None,
            sort_by: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl From<BookQuery> for QueryOptions {
    fn from(query: BookQuery) -> Self {
        let sort_by = query.sort_by.as_deref().and_then(|field| match field.parse() {
            Ok(field) => Some(field),
            Err(reason) => {
                tracing::debug!(%reason, "ignoring sortBy");
                None
            }
        });

        Self {
            search: non_empty(query.search).map(|s| s.to_lowercase()),
            genre: non_empty(query.genre).map(|g| g.to_lowercase()),
            is_available: query.is_available.map(|flag| flag == "true"),
            sort_by,
            page: query
                .page
                .as_deref()
                .and_then(leading_integer)
                .unwrap_or(DEFAULT_PAGE),
            limit: query
                .limit
                .as_deref()
                .and_then(leading_integer)
                .and_then(|limit| usize::try_from(limit).ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_LIMIT),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Integer prefix of `text` after leading whitespace, so `"2.5"` is 2 and
/// `"3abc"` is 3. `None` when no digit follows the optional sign or the
/// value overflows.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits_len = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    text[..sign_len + digits_len].parse().ok()
}

/// Run search, genre, availability, sort and pagination in that order.
pub fn execute(mut books: Vec<Book>, options: &QueryOptions) -> Page<Book> {
    if let Some(needle) = &options.search {
        books.retain(|book| {
            book.title.to_lowercase().contains(needle) || book.author.to_lowercase().contains(needle)
        });
    }

    if let Some(genre) = &options.genre {
        books.retain(|book| book.genre.to_lowercase() == *genre);
    }

    if let Some(is_available) = options.is_available {
        books.retain(|book| book.is_available == is_available);
    }

    if let Some(field) = options.sort_by {
        // Stable: ties keep their filtered order.
        books.sort_by(|a, b| field.compare(a, b));
    }

    paginate(books, options.page, options.limit)
}

fn paginate(books: Vec<Book>, page: i64, limit: usize) -> Page<Book> {
    let total_items = books.len();
    let total_pages = total_items.div_ceil(limit);

    let data = match usize::try_from(page) {
        Ok(page) if page >= 1 => {
            let start = (page - 1).saturating_mul(limit);
            books.into_iter().skip(start).take(limit).collect()
        }
        _ => Vec::new(),
    };

    Page {
        total_items,
        current_page: page,
        total_pages,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::fixtures::new_book;

    fn catalogue() -> Vec<Book> {
        vec![
            Book::new(new_book("Dune", "Frank Herbert", "SciFi", 3)),
            Book::new(new_book("Emma", "Jane Austen", "Classic", 0)),
            Book::new(new_book("Persuasion", "Jane Austen", "classic", 1)),
            Book::new(new_book("Hyperion", "Dan Simmons", "SciFi", 0)),
            Book::new(new_book("Annihilation", "Jeff VanderMeer", "SciFi", 2)),
        ]
    }

    fn titles(page: &Page<Book>) -> Vec<&str> {
        page.data.iter().map(|book| book.title.as_str()).collect()
    }

    fn query(pairs: &[(&str, &str)]) -> QueryOptions {
        BookQuery::from_pairs(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        )
        .into()
    }

    #[test]
    fn defaults_apply_when_absent_or_unparsable() {
        assert_eq!(QueryOptions::from(BookQuery::default()), QueryOptions::default());

        let options = query(&[("page", "two"), ("limit", "ten")]);
        assert_eq!(options.page, 1);
        assert_eq!(options.limit, 10);
    }

    #[test]
    fn non_positive_limit_falls_back_to_default() {
        assert_eq!(query(&[("limit", "0")]).limit, DEFAULT_LIMIT);
        assert_eq!(query(&[("limit", "-5")]).limit, DEFAULT_LIMIT);
    }

    #[test]
    fn numbers_are_read_from_their_leading_digits() {
        let options = query(&[("page", "3abc"), ("limit", "2.5")]);
        assert_eq!(options.page, 3);
        assert_eq!(options.limit, 2);

        let options = query(&[("page", " -2"), ("limit", "+4 per page")]);
        assert_eq!(options.page, -2);
        assert_eq!(options.limit, 4);

        let options = query(&[("page", "-"), ("limit", ".5")]);
        assert_eq!(options.page, DEFAULT_PAGE);
        assert_eq!(options.limit, DEFAULT_LIMIT);

        assert_eq!(query(&[("page", "99999999999999999999")]).page, DEFAULT_PAGE);
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let raw = BookQuery::from_pairs([
            ("page".to_string(), "1".to_string()),
            ("page".to_string(), "2".to_string()),
            ("genre".to_string(), "SciFi".to_string()),
            ("shelf".to_string(), "top".to_string()),
        ]);

        assert_eq!(raw.page.as_deref(), Some("1"));
        assert_eq!(raw.genre.as_deref(), Some("SciFi"));
        assert!(raw.limit.is_none());
    }

    #[test]
    fn search_matches_title_or_author_case_insensitively() {
        let page = execute(catalogue(), &query(&[("search", "AUSTEN")]));
        assert_eq!(titles(&page), ["Emma", "Persuasion"]);

        let page = execute(catalogue(), &query(&[("search", "hyper")]));
        assert_eq!(titles(&page), ["Hyperion"]);
    }

    #[test]
    fn genre_filter_is_exact_and_case_insensitive() {
        let page = execute(catalogue(), &query(&[("genre", "CLASSIC")]));
        assert_eq!(titles(&page), ["Emma", "Persuasion"]);

        let page = execute(catalogue(), &query(&[("genre", "Sci")]));
        assert!(page.data.is_empty());
    }

    #[test]
    fn availability_filter_parses_true_literally() {
        let page = execute(catalogue(), &query(&[("isAvailable", "true")]));
        assert_eq!(titles(&page), ["Dune", "Persuasion", "Annihilation"]);

        let page = execute(catalogue(), &query(&[("isAvailable", "false")]));
        assert_eq!(titles(&page), ["Emma", "Hyperion"]);
    }

    #[test]
    fn genre_page_round_trip_sorted_and_unsorted() {
        let unsorted = execute(catalogue(), &query(&[("genre", "scifi"), ("limit", "3")]));
        assert_eq!(titles(&unsorted), ["Dune", "Hyperion", "Annihilation"]);

        let sorted = execute(
            catalogue(),
            &query(&[("genre", "scifi"), ("limit", "3"), ("sortBy", "title")]),
        );
        assert_eq!(titles(&sorted), ["Annihilation", "Dune", "Hyperion"]);
        assert_eq!(sorted.total_items, 3);
        assert_eq!(sorted.total_pages, 1);
    }

    #[test]
    fn numeric_sort_is_stable_for_ties() {
        let page = execute(catalogue(), &query(&[("sortBy", "availableCopies")]));
        assert_eq!(
            titles(&page),
            ["Emma", "Hyperion", "Persuasion", "Annihilation", "Dune"]
        );
    }

    #[test]
    fn unknown_sort_field_keeps_insertion_order() {
        let page = execute(catalogue(), &query(&[("sortBy", "isbn")]));
        assert_eq!(
            titles(&page),
            ["Dune", "Emma", "Persuasion", "Hyperion", "Annihilation"]
        );
    }

    #[test]
    fn stages_compose_in_order() {
        let page = execute(
            catalogue(),
            &query(&[
                ("search", "a"),
                ("genre", "scifi"),
                ("isAvailable", "true"),
                ("sortBy", "title"),
            ]),
        );
        assert_eq!(titles(&page), ["Annihilation", "Dune"]);
    }

    #[test]
    fn pagination_reports_totals_for_every_page() {
        let books: Vec<Book> = (0..15)
            .map(|i| Book::new(new_book(&format!("Book {i:02}"), "Anon", "Misc", 1)))
            .collect();

        let second = execute(books.clone(), &query(&[("page", "2"), ("limit", "10")]));
        assert_eq!(second.data.len(), 5);
        assert_eq!(second.total_items, 15);
        assert_eq!(second.total_pages, 2);
        assert_eq!(second.current_page, 2);
        assert_eq!(second.data[0].title, "Book 10");

        for limit in 1..=16 {
            let limit_text = limit.to_string();
            let page = execute(books.clone(), &query(&[("limit", limit_text.as_str())]));
            assert_eq!(page.total_pages, 15usize.div_ceil(limit));
            assert!(page.data.len() <= limit);
        }
    }

    #[test]
    fn out_of_range_pages_are_empty_but_keep_totals() {
        for page in ["0", "-3", "4", "9223372036854775807"] {
            let result = execute(catalogue(), &query(&[("page", page), ("limit", "2")]));
            assert!(result.data.is_empty(), "page {page}");
            assert_eq!(result.total_items, 5);
            assert_eq!(result.total_pages, 3);
            assert_eq!(result.current_page, page.parse::<i64>().unwrap());
        }
    }
}
