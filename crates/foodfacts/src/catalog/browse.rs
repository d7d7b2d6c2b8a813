use crate::prelude::{eprintln, print, println, *};
use colored::Colorize;
use foodfacts_core::catalog::SortOption;
use foodfacts_core::state::{update, CatalogState, Event, QueryState};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::list::parse_page;
use super::render::{format_state, Navigation};
use super::{print_config, CatalogClient};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct BrowseOptions {
    /// Page to start on (1-indexed)
    #[arg(short, long, default_value = "1", value_parser = parse_page)]
    pub page: usize,

    /// Initial sort order
    #[arg(short, long, env = "FOODFACTS_SORT", default_value = "none")]
    pub sort: SortOption,

    /// Initial filter text
    #[arg(short, long, default_value = "")]
    pub filter: String,
}

/// Everything the session loop reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Event(Event),
    Help,
    Quit,
}

const HELP: &str = "Commands:
  next, n             Go to the next page
  prev, p             Go to the previous page
  sort <key>          Change the sort order (none, unique_scans_n, popularity_key,
                      nutriscore_score, ecoscore_score)
  filter [text]       Filter by name or ingredients; no text clears the filter
  refresh, r          Fetch the current page again
  help, h             Show this help
  quit, q             Exit";

/// Parse one line of user input; blank lines yield `None`
pub fn parse_command(line: &str) -> std::result::Result<Option<Message>, Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(command, rest)| (command, rest.trim()))
        .unwrap_or((line, ""));

    let message = match command.to_lowercase().as_str() {
        "n" | "next" => Message::Event(Event::NextPage),
        "p" | "prev" | "previous" => Message::Event(Event::PreviousPage),
        "r" | "refresh" => Message::Event(Event::Refresh),
        "h" | "help" | "?" => Message::Help,
        "q" | "quit" | "exit" => Message::Quit,
        "sort" => {
            let sort = rest.parse::<SortOption>().map_err(Error::InvalidArgument)?;
            Message::Event(Event::SortChanged(sort))
        }
        "filter" => Message::Event(Event::FilterChanged(rest.to_string())),
        _ => return Err(Error::UnknownCommand(command.to_string())),
    };

    Ok(Some(message))
}

/// Interactive browser session
///
/// Owns the catalog state. Fetches run as spawned tasks that report back
/// through the same channel user input arrives on.
pub struct Session {
    client: CatalogClient,
    state: CatalogState,
    tx: UnboundedSender<Message>,
}

impl Session {
    pub fn new(client: CatalogClient, state: CatalogState, tx: UnboundedSender<Message>) -> Self {
        Self { client, state, tx }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Handle one message; returns `false` once the session should end
    pub fn handle(&mut self, message: Message) -> bool {
        match message {
            Message::Quit => false,
            Message::Help => {
                println!("{}", HELP);
                true
            }
            Message::Event(event) => {
                if self.dispatch(event) {
                    self.render();
                }
                true
            }
        }
    }

    /// Apply an event; returns whether anything worth re-rendering happened
    fn dispatch(&mut self, event: Event) -> bool {
        if self.state.is_stale(&event) {
            log::debug!(
                "Discarding stale response for generation {:?} (latest {})",
                event.fetch_generation(),
                self.state.generation()
            );
            return false;
        }

        let controls = self.state.controls();
        match event {
            Event::NextPage if !controls.next_enabled => {
                eprintln!("{}", "Next page is not available.".yellow());
                return false;
            }
            Event::PreviousPage if !controls.previous_enabled => {
                eprintln!("{}", "Already on the first page.".yellow());
                return false;
            }
            _ => {}
        }

        let (state, effect) = update(std::mem::take(&mut self.state), event);
        self.state = state;

        if let Some(effect) = effect {
            let client = self.client.clone();
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let event = client.execute(effect).await;
                // The receiver is gone once the session has ended
                let _ = tx.send(Message::Event(event));
            });
        }

        true
    }

    fn render(&self) {
        print!("{}", format_state(self.state(), Navigation::Keys));
    }
}

/// Forward parsed input lines into the session channel until EOF
async fn read_input<R>(input: R, tx: UnboundedSender<Message>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_command(&line) {
                Ok(Some(message)) => {
                    // Stop reading after quit so no stdin read outlives the session
                    let quit = message == Message::Quit;
                    if tx.send(message).is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => eprintln!("{}", err.to_string().red()),
            },
            Ok(None) => {
                let _ = tx.send(Message::Quit);
                break;
            }
            Err(err) => {
                log::warn!("Failed to read input: {err}");
                let _ = tx.send(Message::Quit);
                break;
            }
        }
    }
}

/// Run the session until the user quits or input ends
pub async fn run_session(mut session: Session, mut rx: UnboundedReceiver<Message>) -> CatalogState {
    session.handle(Message::Event(Event::Mount));

    while let Some(message) = rx.recv().await {
        if !session.handle(message) {
            break;
        }
    }

    session.state
}

pub async fn run(options: BrowseOptions, global: crate::Global) -> Result<()> {
    let config = crate::config::load(&global)?;
    print_config(&config, &global);

    let client = CatalogClient::new(&config)?;
    let query = QueryState {
        page: options.page,
        sort: options.sort,
        filter: options.filter,
    };

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(read_input(BufReader::new(tokio::io::stdin()), tx.clone()));

    println!("{}", "Type 'help' for commands.".bright_black());
    let session = Session::new(client, CatalogState::new(query, config.page_size), tx);
    let state = run_session(session, rx).await;
    log::debug!(
        "Session ended on page {} after {} fetches",
        state.query.page,
        state.generation()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use foodfacts_core::state::Phase;
    use mockito::Matcher;

    fn session_for(
        server: &mockito::ServerGuard,
        query: QueryState,
    ) -> (Session, UnboundedReceiver<Message>) {
        let config = config_for(server);
        let client = CatalogClient::new(&config).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Session::new(client, CatalogState::new(query, config.page_size), tx);
        (session, rx)
    }

    /// Wait for the next fetch outcome and feed it to the session
    async fn settle(session: &mut Session, rx: &mut UnboundedReceiver<Message>) {
        let message = rx.recv().await.expect("fetch outcome");
        assert!(matches!(message, Message::Event(_)));
        assert!(session.handle(message));
    }

    fn numbered_body(count: usize) -> String {
        let ids: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let rows: Vec<(&str, &str, &str)> = ids
            .iter()
            .map(|id| (id.as_str(), "Muesli", "oats, raisins"))
            .collect();
        products_body(&rows)
    }

    #[test]
    fn test_parse_command_navigation() {
        assert_eq!(
            parse_command("n").unwrap(),
            Some(Message::Event(Event::NextPage))
        );
        assert_eq!(
            parse_command("  PREV ").unwrap(),
            Some(Message::Event(Event::PreviousPage))
        );
        assert_eq!(
            parse_command("refresh").unwrap(),
            Some(Message::Event(Event::Refresh))
        );
        assert_eq!(parse_command("q").unwrap(), Some(Message::Quit));
        assert_eq!(parse_command("help").unwrap(), Some(Message::Help));
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_command_sort() {
        assert_eq!(
            parse_command("sort popularity_key").unwrap(),
            Some(Message::Event(Event::SortChanged(SortOption::Popularity)))
        );
        assert_eq!(
            parse_command("sort none").unwrap(),
            Some(Message::Event(Event::SortChanged(SortOption::None)))
        );
        assert!(matches!(
            parse_command("sort price"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_command_filter() {
        assert_eq!(
            parse_command("filter dark chocolate").unwrap(),
            Some(Message::Event(Event::FilterChanged(
                "dark chocolate".to_string()
            )))
        );
        assert_eq!(
            parse_command("filter").unwrap(),
            Some(Message::Event(Event::FilterChanged(String::new())))
        );
    }

    #[test]
    fn test_parse_command_unknown() {
        let err = parse_command("jump 3").unwrap_err();
        assert!(matches!(err, Error::UnknownCommand(ref c) if c == "jump"));
        assert!(err.to_string().contains("Type 'help'"));
    }

    #[tokio::test]
    async fn test_session_mount_and_next_page() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Exact(
                "search_terms=&page=1&json=true".to_string(),
            ))
            .with_status(200)
            .with_body(numbered_body(24))
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Exact(
                "search_terms=&page=2&json=true".to_string(),
            ))
            .with_status(200)
            .with_body(numbered_body(24))
            .expect(1)
            .create_async()
            .await;

        let (mut session, mut rx) = session_for(&server, QueryState::default());
        assert!(session.handle(Message::Event(Event::Mount)));
        assert_eq!(session.state().phase, Phase::Loading);
        settle(&mut session, &mut rx).await;
        assert_eq!(session.state().phase, Phase::Ready);
        assert_eq!(session.state().products.len(), 24);

        assert!(session.handle(Message::Event(Event::NextPage)));
        settle(&mut session, &mut rx).await;
        assert_eq!(session.state().query.page, 2);
        assert_eq!(session.state().view().items.len(), 10);

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_session_sort_change_fetches_once() {
        let mut server = mockito::Server::new_async().await;
        let _unsorted = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Exact(
                "search_terms=&page=1&json=true".to_string(),
            ))
            .with_status(200)
            .with_body(numbered_body(5))
            .create_async()
            .await;
        let sorted = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Exact(
                "search_terms=&page=1&json=true&sort_by=popularity_key".to_string(),
            ))
            .with_status(200)
            .with_body(numbered_body(3))
            .expect(1)
            .create_async()
            .await;

        let (mut session, mut rx) = session_for(&server, QueryState::default());
        session.handle(Message::Event(Event::Mount));
        settle(&mut session, &mut rx).await;

        session.handle(Message::Event(Event::SortChanged(SortOption::Popularity)));
        settle(&mut session, &mut rx).await;

        assert_eq!(session.state().query.page, 1);
        assert_eq!(session.state().products.len(), 3);
        sorted.assert_async().await;
    }

    #[tokio::test]
    async fn test_session_filter_does_not_fetch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(products_body(&[
                ("1", "Milk chocolate", "milk, cocoa"),
                ("2", "Bread", "flour, water"),
            ]))
            .expect(1)
            .create_async()
            .await;

        let (mut session, mut rx) = session_for(&server, QueryState::default());
        session.handle(Message::Event(Event::Mount));
        settle(&mut session, &mut rx).await;

        session.handle(Message::Event(Event::FilterChanged("CHOC".to_string())));
        assert_eq!(session.state().phase, Phase::Ready);
        assert_eq!(session.state().view().items.len(), 1);
        assert!(rx.try_recv().is_err());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_session_error_then_refresh() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let (mut session, mut rx) = session_for(&server, QueryState::default());
        session.handle(Message::Event(Event::Mount));
        settle(&mut session, &mut rx).await;
        assert_eq!(
            session.state().phase,
            Phase::Error("Failed to fetch products".to_string())
        );
        failing.assert_async().await;
        failing.remove_async().await;

        let _healthy = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(numbered_body(2))
            .create_async()
            .await;

        session.handle(Message::Event(Event::Refresh));
        settle(&mut session, &mut rx).await;
        assert_eq!(session.state().phase, Phase::Ready);
        assert_eq!(session.state().products.len(), 2);
    }

    #[tokio::test]
    async fn test_session_ignores_stale_response() {
        let server = mockito::Server::new_async().await;
        let (mut session, _rx) = session_for(&server, QueryState::default());

        let stale = Message::Event(Event::FetchSucceeded {
            generation: 99,
            products: Vec::new(),
        });
        assert!(session.handle(stale));
        assert_eq!(session.state().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_session_event_keeps_state_settings() {
        let server = mockito::Server::new_async().await;
        let client = CatalogClient::new(&config_for(&server)).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let query = QueryState {
            page: 3,
            sort: SortOption::Popularity,
            filter: String::new(),
        };
        let mut session = Session::new(client, CatalogState::new(query, 4), tx);

        assert!(session.handle(Message::Event(Event::FilterChanged("oats".to_string()))));
        let state = session.state();
        assert_eq!(state.page_size, 4);
        assert_eq!(state.query.page, 3);
        assert_eq!(state.query.sort, SortOption::Popularity);
        assert_eq!(state.query.filter, "oats");
        assert_eq!(state.generation(), 0);
    }

    #[tokio::test]
    async fn test_run_session_stops_on_quit() {
        let server = mockito::Server::new_async().await;
        let (session, rx) = session_for(&server, QueryState::default());
        session.tx.send(Message::Quit).unwrap();

        let state = run_session(session, rx).await;
        assert_eq!(state.generation(), 1);
    }
}
