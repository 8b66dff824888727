use crate::app::table::render_table;
use crate::core::export::CsvExporter;
use crate::core::search::is_query_too_short;
use crate::core::session::OrderSession;
use crate::core::{SourceTag, Storage};
use crate::utils::error::{MercurialeError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const EMPTY_ORDER_TEXT: &str = "Aucun article ajouté pour le moment.";
pub const NO_RESULTS_TEXT: &str = "Aucun résultat.";
pub const EXPORT_DISABLED_TEXT: &str = "Téléchargement indisponible : la liste de commande est vide.";

const HELP_TEXT: &str = "\
Commandes :
  source <folkestone|vendome|washington>   changer de mercuriale
  search <texte>      (?)                  rechercher par code ou libellé
  add <code> | add #<n>  (+)               ajouter un article (ou la ligne n des résultats)
  remove <code> <source>  (-)              retirer un article de la commande
  list                                     afficher la commande
  export [fichier]                         écrire la commande en CSV
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Source(String),
    Search(String),
    Add(String),
    AddRow(usize),
    Remove { code: String, source: String },
    List,
    Export(Option<String>),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parses one console line.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "source" | "s" => Command::Source(rest.to_string()),
        "search" | "chercher" | "?" => Command::Search(rest.to_string()),
        "add" | "ajouter" | "+" => match rest.strip_prefix('#').map(str::parse::<usize>) {
            Some(Ok(n)) => Command::AddRow(n),
            _ => Command::Add(rest.to_string()),
        },
        "remove" | "retirer" | "-" => {
            // 代碼可能含空白，來源永遠是最後一個字
            match rest.rsplit_once(char::is_whitespace) {
                Some((code, source)) => Command::Remove {
                    code: code.trim().to_string(),
                    source: source.to_string(),
                },
                None => Command::Unknown(line.to_string()),
            }
        }
        "list" | "liste" | "ls" => Command::List,
        "export" | "exporter" => Command::Export(if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }),
        "help" | "aide" | "h" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn message(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quit: false,
        }
    }
}

/// Text front end over an [`OrderSession`].
pub struct Console<S: Storage> {
    session: OrderSession,
    storage: S,
    export_filename: String,
    query: String,
    last_results: Vec<String>,
}

impl<S: Storage> Console<S> {
    pub fn new(session: OrderSession, storage: S, export_filename: String) -> Self {
        Self {
            session,
            storage,
            export_filename,
            query: String::new(),
            last_results: Vec::new(),
        }
    }

    pub fn session(&self) -> &OrderSession {
        &self.session
    }

    pub fn placeholder(&self) -> String {
        format!(
            "Commencez à taper pour rechercher dans la mercuriale \"{}\".",
            self.session.active_source().label()
        )
    }

    pub async fn handle_line(&mut self, line: &str) -> Reply {
        self.execute(parse_command(line)).await
    }

    pub async fn execute(&mut self, command: Command) -> Reply {
        match command {
            Command::Empty => Reply::message(""),
            Command::Help => Reply::message(HELP_TEXT),
            Command::Quit => Reply {
                text: "Au revoir.".to_string(),
                quit: true,
            },
            Command::Unknown(line) => {
                Reply::message(format!("Commande inconnue : {} (tapez \"help\")", line))
            }
            Command::Source(name) => match name.parse::<SourceTag>() {
                Ok(source) => {
                    self.session.set_source(source);
                    // 換來源要清掉查詢與結果
                    self.query.clear();
                    self.last_results.clear();
                    Reply::message(self.placeholder())
                }
                Err(e) => Reply::message(notice(&e)),
            },
            Command::Search(query) => Reply::message(self.search(query)),
            Command::Add(code) => Reply::message(self.add(&code)),
            Command::AddRow(n) => match n.checked_sub(1).and_then(|i| self.last_results.get(i)) {
                Some(code) => {
                    let code = code.clone();
                    Reply::message(self.add(&code))
                }
                None => Reply::message(format!("Pas de ligne {} dans les derniers résultats.", n)),
            },
            Command::Remove { code, source } => match source.parse::<SourceTag>() {
                Ok(source) => {
                    self.session.remove(&code, source);
                    Reply::message(self.render_order())
                }
                Err(e) => Reply::message(notice(&e)),
            },
            Command::List => Reply::message(self.render_order()),
            Command::Export(filename) => Reply::message(self.export(filename).await),
        }
    }

    fn search(&mut self, query: String) -> String {
        self.query = query;
        self.last_results.clear();

        if is_query_too_short(&self.query) {
            return self.placeholder();
        }

        let results = self.session.search(&self.query);
        if results.is_empty() {
            return NO_RESULTS_TEXT.to_string();
        }

        let dataset_headers = self.session.active_dataset().headers();
        let mut headers = vec!["#".to_string()];
        headers.extend(dataset_headers.iter().cloned());

        let rows: Vec<Vec<String>> = results
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let mut row = vec![(i + 1).to_string()];
                row.extend(dataset_headers.iter().map(|h| record.field_text(h)));
                row
            })
            .collect();

        self.last_results = results.iter().map(|r| r.code()).collect();
        tracing::debug!("Search '{}' returned {} results", self.query, rows.len());
        render_table(&headers, &rows)
    }

    fn add(&mut self, code: &str) -> String {
        let before = self.session.order().len();
        match self.session.add(code) {
            Ok(()) if self.session.order().len() > before => self.render_order(),
            // 找不到代碼：不做任何事
            Ok(()) => String::new(),
            Err(e) => notice(&e),
        }
    }

    fn render_order(&self) -> String {
        let order = self.session.order();
        if order.is_empty() {
            return EMPTY_ORDER_TEXT.to_string();
        }

        let fields = order.columns();
        let columns = CsvExporter::columns(order);
        let rows: Vec<Vec<String>> = order
            .entries()
            .iter()
            .map(|entry| entry.cells(&fields))
            .collect();
        render_table(&columns, &rows)
    }

    async fn export(&self, filename: Option<String>) -> String {
        if !self.session.can_export() {
            return EXPORT_DISABLED_TEXT.to_string();
        }

        let filename = filename.unwrap_or_else(|| self.export_filename.clone());
        match self.session.export_to(&self.storage, &filename).await {
            Ok(path) => format!("✅ Commande exportée : {}", path),
            Err(e) => {
                tracing::error!("❌ Export failed: {}", e);
                format!("❌ {}", e.user_friendly_message())
            }
        }
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        output
            .write_all(format!("{}\n", self.placeholder()).as_bytes())
            .await?;

        let mut lines = input.lines();
        loop {
            output.write_all(b"> ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let reply = self.handle_line(&line).await;
            if !reply.text.is_empty() {
                output.write_all(reply.text.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            if reply.quit {
                break;
            }
        }

        output.flush().await?;
        Ok(())
    }
}

fn notice(error: &MercurialeError) -> String {
    format!("⚠ {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::core::Dataset;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                MercurialeError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.to_vec());
            Ok(path.to_string())
        }
    }

    fn dataset(source: SourceTag, values: Vec<serde_json::Value>) -> Dataset {
        Dataset::new(
            source,
            values
                .into_iter()
                .map(|v| serde_json::from_value(v).unwrap())
                .collect(),
        )
    }

    fn console() -> (Console<MockStorage>, MockStorage) {
        let catalog = Catalog::new(
            dataset(
                SourceTag::Folkestone,
                vec![
                    json!({"Code Produit": "A1", "Libellé produit": "Pain"}),
                    json!({"Code Produit": "A2", "Libellé produit": "Pain complet"}),
                ],
            ),
            dataset(
                SourceTag::Vendome,
                vec![json!({"Code Produit": "A1", "Libellé produit": "Pain de mie"})],
            ),
            dataset(SourceTag::Washington, vec![]),
        );
        let storage = MockStorage::default();
        let console = Console::new(
            OrderSession::new(catalog),
            storage.clone(),
            "ma_commande.csv".to_string(),
        );
        (console, storage)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  "), Command::Empty);
        assert_eq!(parse_command("source Vendome"), Command::Source("Vendome".into()));
        assert_eq!(parse_command("? pain de mie"), Command::Search("pain de mie".into()));
        assert_eq!(parse_command("add A1"), Command::Add("A1".into()));
        assert_eq!(parse_command("+ #2"), Command::AddRow(2));
        assert_eq!(
            parse_command("remove A 1 vendome"),
            Command::Remove {
                code: "A 1".into(),
                source: "vendome".into()
            }
        );
        assert_eq!(parse_command("EXPORT"), Command::Export(None));
        assert_eq!(parse_command("export x.csv"), Command::Export(Some("x.csv".into())));
        assert_eq!(parse_command("q"), Command::Quit);
        assert!(matches!(parse_command("remove A1"), Command::Unknown(_)));
        assert!(matches!(parse_command("frobnicate"), Command::Unknown(_)));
    }

    #[tokio::test]
    async fn test_short_query_shows_placeholder() {
        let (mut console, _) = console();
        let reply = console.handle_line("search p").await;
        assert_eq!(
            reply.text,
            "Commencez à taper pour rechercher dans la mercuriale \"Folkestone\"."
        );
    }

    #[tokio::test]
    async fn test_search_then_add_by_row() {
        let (mut console, _) = console();

        let results = console.handle_line("search pain").await;
        assert!(results.text.contains("Pain complet"));

        let order = console.handle_line("add #2").await;
        assert!(order.text.starts_with("Source"));
        assert!(order.text.contains("folkestone | A2"));
        assert_eq!(console.session().order().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_add_shows_notice() {
        let (mut console, _) = console();
        console.handle_line("add A1").await;

        let reply = console.handle_line("add A1").await;

        assert_eq!(
            reply.text,
            "⚠ Cet article de la mercuriale \"folkestone\" est déjà dans la liste de commande."
        );
        assert_eq!(console.session().order().len(), 1);
    }

    #[tokio::test]
    async fn test_switching_source_clears_results() {
        let (mut console, _) = console();
        console.handle_line("search pain").await;

        let reply = console.handle_line("source vendome").await;
        assert!(reply.text.contains("\"Vendome\""));

        let add = console.handle_line("add #1").await;
        assert!(add.text.starts_with("Pas de ligne 1"));
    }

    #[tokio::test]
    async fn test_export_disabled_when_empty() {
        let (mut console, storage) = console();
        let reply = console.handle_line("export").await;
        assert_eq!(reply.text, EXPORT_DISABLED_TEXT);
        assert!(storage.files.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_export_writes_csv() {
        let (mut console, storage) = console();
        console.handle_line("add A1").await;
        console.handle_line("source vendome").await;
        console.handle_line("add A1").await;

        let reply = console.handle_line("export").await;
        assert!(reply.text.contains("ma_commande.csv"));

        let data = storage.read_file("ma_commande.csv").await.unwrap();
        let text = String::from_utf8(data).unwrap();
        assert_eq!(
            text,
            "\u{FEFF}Source;Code Produit;Libellé produit\nfolkestone;A1;Pain\nvendome;A1;Pain de mie"
        );
    }

    #[tokio::test]
    async fn test_remove_and_list() {
        let (mut console, _) = console();
        console.handle_line("add A1").await;

        let reply = console.handle_line("remove A1 folkestone").await;
        assert_eq!(reply.text, EMPTY_ORDER_TEXT);
        assert_eq!(console.handle_line("list").await.text, EMPTY_ORDER_TEXT);
    }

    #[tokio::test]
    async fn test_run_reads_until_quit() {
        let (mut console, _) = console();
        let input: &[u8] = b"search pain\nadd A1\nquit\nadd A2\n";
        let mut output = Vec::new();

        console.run(input, &mut output).await.unwrap();

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("Pain complet"));
        assert!(transcript.contains("Au revoir."));
        assert_eq!(console.session().order().len(), 1);
    }
}
