use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use std::num::NonZeroUsize;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

use meal_finder::{
    DetailView, FinderConfig, LikeOutcome, MealFinder, Paginator, RecipeSummary, SearchMode,
    SearchRequest, SearchSession, SearchState,
};

#[derive(Parser)]
#[command(name = "meal-finder", version, about = "Search TheMealDB recipes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search by name or ingredient, category, or cuisine
    Search {
        term: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Text)]
        mode: ModeArg,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show a random meal
    Random,
    /// Show a meal's details
    Show { id: String },
    /// Like a meal, or unlike it if already liked
    Like { id: String },
    /// List liked meals
    Liked {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// List the available categories
    Categories,
    /// List the available cuisines
    Areas,
    /// Type searches line by line; lines starting with ':' are commands
    Interactive,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Text,
    Category,
    Area,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Text => SearchMode::Text,
            ModeArg::Category => SearchMode::Category,
            ModeArg::Area => SearchMode::Area,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = FinderConfig::load()?;
    debug!("{:#?}", config);
    let finder = MealFinder::builder().config(config).build()?;

    match cli.command {
        Command::Search { term, mode, page } => {
            let request = SearchRequest::for_mode(mode.into(), term);
            let meals = finder.search(&request).await?;
            if meals.is_empty() {
                println!("No recipe matching your search");
            } else {
                print_page(&meals, finder.page_size(), page);
            }
        }
        Command::Random => {
            let meals = finder.search(&SearchRequest::Random).await?;
            match meals.first() {
                Some(meal) => print_detail(finder.detail(&meal.id).await),
                None => println!("No recipe matching your search"),
            }
        }
        Command::Show { id } => print_detail(finder.detail(&id).await),
        Command::Like { id } => {
            let (outcome, meal) = finder.toggle_like(&id).await?;
            match outcome {
                LikeOutcome::Liked => println!("Liked {} ({})", meal.name, meal.id),
                LikeOutcome::Unliked => println!("Unliked {} ({})", meal.name, meal.id),
            }
        }
        Command::Liked { page } => {
            let liked = finder.liked().await?;
            println!("Liked Recipes");
            print_page(&liked, finder.liked_page_size(), page);
        }
        Command::Categories => {
            for category in finder.api().list_categories().await? {
                println!("{}", category);
            }
        }
        Command::Areas => {
            for area in finder.api().list_areas().await? {
                println!("{}", area);
            }
        }
        Command::Interactive => interactive(&finder).await?,
    }

    Ok(())
}

fn print_page(meals: &[RecipeSummary], page_size: NonZeroUsize, page: usize) {
    let mut pages = Paginator::new(meals, page_size);
    if !pages.select(page) && !meals.is_empty() {
        println!("Page {} does not exist, showing page 1", page);
    }

    for meal in pages.current() {
        println!("{:>8}  {}", meal.id, meal.name);
    }

    let indicators: Vec<String> = pages
        .indicators()
        .iter()
        .map(|p| {
            if p.active {
                format!("[{}]", p.number)
            } else {
                p.number.to_string()
            }
        })
        .collect();
    if indicators.len() > 1 {
        println!("Pages: {}", indicators.join(" "));
    }
}

fn print_detail(view: DetailView) {
    let (recipe, liked) = match view {
        DetailView::Loaded { recipe, liked } => (recipe, liked),
        other => {
            println!("{}", other.message().unwrap_or_default());
            return;
        }
    };

    println!(
        "{} {}",
        recipe.name(),
        if liked { "(liked)" } else { "" }
    );
    let badges: Vec<&str> = [recipe.category.as_deref(), recipe.area.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !badges.is_empty() {
        println!("{}", badges.join(" · "));
    }
    if !recipe.tags.is_empty() {
        println!("Tags: {}", recipe.tags.join(", "));
    }
    println!("{}", recipe.summary.thumbnail_url);

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient);
    }

    if let Some(video) = recipe.video_embed_url() {
        println!("\nVideo: {}", video);
    }

    println!("\nInstructions:");
    let numbered = recipe.has_numbered_steps();
    for step in recipe.instruction_steps() {
        if numbered {
            println!("Step {}\n", step);
        } else {
            println!("{}", step);
        }
    }

    if let Some(source) = &recipe.source_url {
        println!("\nSource: {}", source);
    }
}

fn print_state(state: &SearchState, page_size: NonZeroUsize, page: usize) {
    if let Some(message) = &state.error_message {
        println!("Error: {}", message);
    }
    if state.is_loading {
        return;
    }
    if state.has_no_results() {
        println!("No recipe matching your search");
    } else if state.results.is_some() {
        print_page(state.results(), page_size, page);
    }
}

async fn interactive(finder: &MealFinder) -> Result<(), Box<dyn std::error::Error>> {
    let session = finder.session();
    let options = session.load_filter_options().await;
    println!(
        "{} categories, {} cuisines. Commands: :mode text|category|area, :pick <value>, \
         :surprise, :page <n>, :like <id>, :quit",
        options.categories.len(),
        options.areas.len()
    );

    let page_size = finder.page_size();
    let mut updates = session.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if !state.is_loading {
                print_state(&state, page_size, 1);
            }
        }
    });

    let mut pending = None;
    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.strip_prefix(':') {
            Some(command) => {
                if !run_command(finder, &session, command).await {
                    break;
                }
            }
            None => pending = Some(session.input(&line)),
        }
    }

    // Let the last debounced search finish, then close the state channel so
    // the printer exits once it has shown everything
    if let Some(search) = pending {
        search.await?;
    }
    drop(session);
    printer.await?;
    Ok(())
}

/// Returns `false` when the user asked to quit.
async fn run_command(finder: &MealFinder, session: &SearchSession, command: &str) -> bool {
    let (name, argument) = command
        .split_once(' ')
        .map(|(name, argument)| (name, argument.trim()))
        .unwrap_or((command, ""));

    match name {
        "quit" | "q" => return false,
        "mode" => match ModeArg::from_str(argument, true) {
            Ok(mode) => session.set_mode(mode.into()),
            Err(e) => println!("{}", e),
        },
        "pick" => session.select_filter(argument).await,
        "surprise" => session.surprise_me().await,
        "page" => match argument.parse::<usize>() {
            Ok(page) => print_page(session.state().results(), finder.page_size(), page),
            Err(_) => println!("Usage: :page <number>"),
        },
        "like" => match finder.toggle_like(argument).await {
            Ok((LikeOutcome::Liked, meal)) => println!("Liked {}", meal.name),
            Ok((LikeOutcome::Unliked, meal)) => println!("Unliked {}", meal.name),
            Err(e) => println!("Error: {}", e.user_message()),
        },
        other => println!("Unknown command: {}", other),
    }
    true
}
