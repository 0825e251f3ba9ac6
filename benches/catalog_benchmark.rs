use booklist_service::models::book::Book;
use booklist_service::models::filter::{BookFilter, FilterParams};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn create_sample_books() -> Vec<Book> {
    let mut books = vec![
        Book {
            id: "1".to_string(),
            title: "The Power Of Habit".to_string(),
            author: "Charles Duhigg".to_string(),
            isbn: "081298160X".to_string(),
        },
        Book {
            id: "2".to_string(),
            title: "Atomic Habits".to_string(),
            author: "James Clear".to_string(),
            isbn: "0735211299".to_string(),
        },
    ];

    // Add more books for benchmarking
    for i in 3..5000 {
        books.push(Book {
            id: i.to_string(),
            title: format!("Test Book {}", i),
            author: format!("Test Author {}", i % 50),
            isbn: format!("{:010}", i),
        });
    }

    books
}

fn filter_books(books: &[Book], filter: &BookFilter) -> usize {
    books.iter().filter(|book| filter.matches(book)).count()
}

fn bench_title_prefix(c: &mut Criterion) {
    let books = create_sample_books();
    let filter = BookFilter::from_params(&FilterParams {
        title: Some("Test Book 4".to_string()),
        ..FilterParams::default()
    });

    c.bench_function("title_prefix_filter", |b| {
        b.iter(|| filter_books(black_box(&books), black_box(&filter)))
    });
}

fn bench_combined(c: &mut Criterion) {
    let books = create_sample_books();
    let filter = BookFilter::from_params(&FilterParams {
        title: Some("Test".to_string()),
        author: Some("Test Author 7".to_string()),
        isbn: None,
    });

    c.bench_function("combined_filter", |b| {
        b.iter(|| filter_books(black_box(&books), black_box(&filter)))
    });
}

criterion_group!(benches, bench_title_prefix, bench_combined);
criterion_main!(benches);
