use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "bookstore-cli")]
#[command(about = "Command line client for the bookstore catalogue service")]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    server: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Operator: add a new title to the catalogue.
    AddBook {
        #[arg(long)]
        isbn: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        copies: i64,
    },
    /// Operator: restock copies of an existing title.
    AddCopies {
        #[arg(long)]
        isbn: i64,
        #[arg(long)]
        count: i64,
    },
    /// Operator: remove one or more titles by ISBN.
    RemoveBooks {
        #[arg(long, value_delimiter = ',')]
        isbns: Vec<i64>,
    },
    /// Operator: empty the catalogue.
    RemoveAll,
    /// Operator: list every title with full stock detail.
    List,
    /// Operator: list titles that have had at least one missed sale.
    InDemand,
    /// Operator: flag or unflag a title as an editor pick.
    SetEditorPick {
        #[arg(long)]
        isbn: i64,
        #[arg(long)]
        pick: bool,
    },
    /// Purchaser: buy one or more copies of a title.
    Buy {
        #[arg(long)]
        isbn: i64,
        #[arg(long, default_value_t = 1)]
        count: i64,
    },
    /// Purchaser: rate a title from 0 to 5.
    Rate {
        #[arg(long)]
        isbn: i64,
        #[arg(long)]
        rating: u8,
    },
    /// Purchaser: browse titles by ISBN.
    Browse {
        #[arg(long, value_delimiter = ',')]
        isbns: Vec<i64>,
    },
    /// Purchaser: sample up to `count` editor picks.
    EditorPicks {
        #[arg(long, default_value_t = 5)]
        count: i64,
    },
    /// Purchaser: list the top-rated titles.
    TopRated {
        #[arg(long, default_value_t = 5)]
        count: i64,
    },
    /// Check whether the service is reachable.
    Health,
}

#[derive(Serialize)]
struct StockBookRequest {
    isbn: i64,
    title: String,
    author: String,
    price: f64,
    num_copies: i64,
    num_sale_misses: i64,
    total_rating: i64,
    num_times_rated: i64,
    editor_pick: bool,
}

#[derive(Serialize)]
struct BookCopyRequest {
    isbn: i64,
    count: i64,
}

#[derive(Serialize)]
struct BookRatingRequest {
    isbn: i64,
    rating: u8,
}

#[derive(Serialize)]
struct BookEditorPickRequest {
    isbn: i64,
    editor_pick: bool,
}

#[derive(Serialize)]
struct IsbnSetRequest {
    isbns: Vec<i64>,
}

#[derive(Deserialize)]
struct StockBook {
    isbn: i64,
    title: String,
    author: String,
    price: f64,
    num_copies: i64,
    num_sale_misses: i64,
    total_rating: i64,
    num_times_rated: i64,
    editor_pick: bool,
}

#[derive(Deserialize)]
struct Book {
    isbn: i64,
    title: String,
    author: String,
    price: f64,
}

async fn print_error_body(response: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    println!("Error: {status}");
    if !body.is_empty() {
        println!("{body}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::AddBook { isbn, title, author, price, copies } => {
            let request = vec![StockBookRequest {
                isbn,
                title,
                author,
                price,
                num_copies: copies,
                num_sale_misses: 0,
                total_rating: 0,
                num_times_rated: 0,
                editor_pick: false,
            }];
            let response = client.post(format!("{}/store/books", cli.server)).json(&request).send().await?;
            if response.status().is_success() {
                println!("Added isbn {isbn}");
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::AddCopies { isbn, count } => {
            let request = vec![BookCopyRequest { isbn, count }];
            let response = client.post(format!("{}/store/copies", cli.server)).json(&request).send().await?;
            if response.status().is_success() {
                println!("Added {count} copies to isbn {isbn}");
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::RemoveBooks { isbns } => {
            let request = IsbnSetRequest { isbns: isbns.clone() };
            let response = client.delete(format!("{}/store/books", cli.server)).json(&request).send().await?;
            if response.status().is_success() {
                println!("Removed {} isbn(s)", isbns.len());
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::RemoveAll => {
            let response = client.delete(format!("{}/store/books/all", cli.server)).send().await?;
            if response.status().is_success() {
                println!("Catalogue cleared");
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::List => {
            let response = client.get(format!("{}/store/books", cli.server)).send().await?;
            if response.status().is_success() {
                let books: Vec<StockBook> = response.json().await?;
                for b in books {
                    println!(
                        "{:>10}  {:<30} {:<20} ${:>6.2}  copies={:<4} misses={:<4} rating={:.2} pick={}",
                        b.isbn,
                        b.title,
                        b.author,
                        b.price,
                        b.num_copies,
                        b.num_sale_misses,
                        if b.num_times_rated > 0 { b.total_rating as f64 / b.num_times_rated as f64 } else { -1.0 },
                        b.editor_pick
                    );
                }
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::InDemand => {
            let response = client.get(format!("{}/store/books/in-demand", cli.server)).send().await?;
            if response.status().is_success() {
                let books: Vec<StockBook> = response.json().await?;
                for b in books {
                    println!("{:>10}  {:<30} sale_misses={}", b.isbn, b.title, b.num_sale_misses);
                }
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::SetEditorPick { isbn, pick } => {
            let request = vec![BookEditorPickRequest { isbn, editor_pick: pick }];
            let response = client.post(format!("{}/store/editor-picks", cli.server)).json(&request).send().await?;
            if response.status().is_success() {
                println!("isbn {isbn} editor_pick={pick}");
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::Buy { isbn, count } => {
            let request = vec![BookCopyRequest { isbn, count }];
            let response = client.post(format!("{}/purchase/books", cli.server)).json(&request).send().await?;
            if response.status().is_success() {
                println!("Bought {count} copies of isbn {isbn}");
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::Rate { isbn, rating } => {
            let request = vec![BookRatingRequest { isbn, rating }];
            let response =
                client.post(format!("{}/purchase/books/ratings", cli.server)).json(&request).send().await?;
            if response.status().is_success() {
                println!("Rated isbn {isbn} as {rating}");
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::Browse { isbns } => {
            let request = IsbnSetRequest { isbns };
            let response =
                client.post(format!("{}/purchase/books/lookup", cli.server)).json(&request).send().await?;
            if response.status().is_success() {
                let books: Vec<Book> = response.json().await?;
                for b in books {
                    println!("{:>10}  {:<30} {:<20} ${:.2}", b.isbn, b.title, b.author, b.price);
                }
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::EditorPicks { count } => {
            let response =
                client.get(format!("{}/purchase/editor-picks?k={}", cli.server, count)).send().await?;
            if response.status().is_success() {
                let books: Vec<Book> = response.json().await?;
                for b in books {
                    println!("{:>10}  {:<30} {}", b.isbn, b.title, b.author);
                }
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::TopRated { count } => {
            let response = client.get(format!("{}/purchase/top-rated?k={}", cli.server, count)).send().await?;
            if response.status().is_success() {
                let books: Vec<Book> = response.json().await?;
                for (i, b) in books.into_iter().enumerate() {
                    println!("{}. {:>10}  {:<30} {}", i + 1, b.isbn, b.title, b.author);
                }
            } else {
                print_error_body(response).await?;
            }
        }

        Commands::Health => {
            let response = client.get(format!("{}/health", cli.server)).send().await?;
            if response.status().is_success() {
                let health: serde_json::Value = response.json().await?;
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                print_error_body(response).await?;
            }
        }
    }

    Ok(())
}
