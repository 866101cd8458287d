use std::{collections::HashSet, sync::Arc};

use chrono::{NaiveDate, Utc};
use color_eyre::eyre::Result;
use dotenv::dotenv;
use futures::StreamExt;
use slotbook_ui::{
    board::SlotBoard,
    calendar::{MonthView, available_days},
    client::SlotsClient,
    command::{Command, HELP},
    config::UiConfig,
    push,
    render::render_slot_list,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::Mutex,
};
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

struct Session {
    config: UiConfig,
    client: SlotsClient,
    board: Arc<Mutex<SlotBoard>>,
    view: MonthView,
    available: HashSet<NaiveDate>,
}

impl Session {
    fn new(config: UiConfig) -> Self {
        let client = SlotsClient::new(&config.api_url);
        Self {
            config,
            client,
            board: Arc::new(Mutex::new(SlotBoard::new())),
            view: MonthView::new(Utc::now().date_naive()),
            available: HashSet::new(),
        }
    }

    async fn run(&mut self, command: Command) {
        match command {
            Command::Date(date) => self.show_date(date).await,
            Command::NextMonth => {
                self.view.next_month();
                self.show_calendar().await;
            }
            Command::PrevMonth => {
                self.view.prev_month();
                self.show_calendar().await;
            }
            Command::Available => self.show_available().await,
            Command::Reserve(id) => self.reserve(id).await,
            Command::Cancel(id) => self.cancel(id).await,
            Command::Reset => self.reset().await,
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    // Navigation re-fetches, which also repairs any pushes that were missed.
    async fn refresh_markers(&mut self) {
        match self.client.list_available().await {
            Ok(slots) => self.available = available_days(&slots),
            Err(e) => error!("Failed to load available slots: {}", e),
        }
    }

    async fn show_calendar(&mut self) {
        self.refresh_markers().await;
        print!("{}", self.view.render(&self.available));
    }

    async fn show_date(&mut self, date: NaiveDate) {
        self.view.select(date);
        match self.client.list_by_date(date).await {
            Ok(slots) => {
                let mut board = self.board.lock().await;
                board.replace(slots);
                println!("Slots for {}:", date.format("%A %d %B %Y"));
                print!("{}", render_slot_list(&board, &board.slots_on(date)));
            }
            Err(e) => println!("{}", e),
        }
    }

    async fn show_available(&mut self) {
        match self.client.list_available().await {
            Ok(slots) => {
                self.available = available_days(&slots);
                let mut board = self.board.lock().await;
                board.replace(slots);
                print!("{}", render_slot_list(&board, &board.slots()));
            }
            Err(e) => println!("{}", e),
        }
    }

    async fn reserve(&mut self, id: i32) {
        let nurse_id = match self.config.require_nurse_id() {
            Ok(nurse_id) => nurse_id.to_string(),
            Err(e) => return println!("{}", e),
        };

        let pending = match self.board.lock().await.begin_reserve(id, &nurse_id) {
            Ok(pending) => pending,
            Err(_) => return println!("Slot #{} is not available", id),
        };
        println!("Reserving slot #{}...", id);

        // The board lock is not held across the request so pushes keep flowing.
        let outcome = self.client.reserve(id, &nurse_id).await;
        match self.board.lock().await.settle(pending, outcome) {
            Ok(slot) => println!("Reserved slot #{} for {}", slot.id, nurse_id),
            Err(e) => {
                error!(slot_id = id, "Reservation failed: {}", e);
                println!("Could not reserve slot #{}: {}", id, e);
            }
        }
    }

    async fn cancel(&mut self, id: i32) {
        let nurse_id = match self.config.require_nurse_id() {
            Ok(nurse_id) => nurse_id.to_string(),
            Err(e) => return println!("{}", e),
        };

        match self.client.cancel(id, &nurse_id).await {
            Ok(slot) => {
                self.board.lock().await.apply_push(slot);
                println!("Cancelled reservation for slot #{}", id);
            }
            Err(e) => {
                error!(slot_id = id, "Cancellation failed: {}", e);
                println!("Could not cancel slot #{}: {}", id, e);
            }
        }
    }

    async fn reset(&mut self) {
        match self.client.reset().await {
            Ok(reset) => {
                let mut board = self.board.lock().await;
                for slot in reset.updated_slots.iter().cloned() {
                    board.apply_push(slot);
                }
                println!("{} ({} slots)", reset.message, reset.updated_slots.len());
            }
            Err(e) => println!("{}", e),
        }
    }
}

fn spawn_push_listener(api_url: String, board: Arc<Mutex<SlotBoard>>) {
    tokio::spawn(async move {
        let mut events = match push::subscribe(&api_url).await {
            Ok(events) => events,
            Err(e) => {
                warn!("Live updates unavailable: {:#}", e);
                return;
            }
        };

        while let Some(event) = events.next().await {
            let slot = event.slot().clone();
            let (id, status) = (slot.id, slot.status);
            if board.lock().await.apply_push(slot) {
                println!("Update: slot #{} is now {}", id, status);
            }
        }
        warn!("Push channel closed; use 'available' or 'date' to refresh");
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = UiConfig::from_env()?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Using SlotBook API at {}", config.api_url);
    let mut session = Session::new(config);
    spawn_push_listener(session.config.api_url.clone(), session.board.clone());

    session.show_calendar().await;
    let today = session.view.selected();
    session.show_date(today).await;
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => session.run(command).await,
            Err(message) => println!("{}", message),
        }
    }

    Ok(())
}
