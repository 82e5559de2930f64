//! Lazy file-browser demo: a fake filesystem served in pages of 20,
//! expanded with Enter/Right, prefetched as you scroll.

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use futures::executor::block_on;
use lazytree::crossterm_input::input_event_from_crossterm;
use lazytree::render::render_str_clipped;
use lazytree::EdgeState;
use lazytree::FetchPage;
use lazytree::PageUpdate;
use lazytree::Tree;
use lazytree::TreeSource;
use lazytree::TreeViewAction;
use lazytree::TreeViewState;
use lazytree_core::ROOT_KEY;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::Terminal;

#[derive(Clone, Debug, PartialEq)]
struct Dir {
    id: String,
    name: String,
}

#[derive(Clone, Debug, PartialEq)]
struct FileEntry {
    id: String,
    name: String,
    size: u64,
}

/// In-memory filesystem listing directories and files in fixed-size pages.
struct FakeFs {
    dirs: HashMap<String, Vec<Dir>>,
    files: HashMap<String, Vec<FileEntry>>,
    page_size: usize,
}

impl FakeFs {
    fn generate() -> Self {
        let mut dirs: HashMap<String, Vec<Dir>> = HashMap::new();
        let mut files: HashMap<String, Vec<FileEntry>> = HashMap::new();

        let top: Vec<Dir> = ["src", "docs", "vendor", "assets"]
            .iter()
            .map(|name| Dir {
                id: format!("/{name}"),
                name: name.to_string(),
            })
            .collect();

        for dir in &top {
            let subs: Vec<Dir> = (0..4)
                .map(|i| Dir {
                    id: format!("{}/sub-{i}", dir.id),
                    name: format!("sub-{i}"),
                })
                .collect();
            for sub in &subs {
                files.insert(
                    sub.id.clone(),
                    (0..55)
                        .map(|i| FileEntry {
                            id: format!("{}/file-{i:03}", sub.id),
                            name: format!("file-{i:03}.rs"),
                            size: 128 + (i as u64 * 37) % 9000,
                        })
                        .collect(),
                );
            }
            dirs.insert(dir.id.clone(), subs);
            files.insert(
                dir.id.clone(),
                (0..12)
                    .map(|i| FileEntry {
                        id: format!("{}/readme-{i}", dir.id),
                        name: format!("readme-{i}.md"),
                        size: 1024 + i as u64,
                    })
                    .collect(),
            );
        }
        dirs.insert(ROOT_KEY.to_string(), top);

        Self {
            dirs,
            files,
            page_size: 20,
        }
    }

    fn page<T: Clone>(&self, all: Option<&Vec<T>>, edge: &EdgeState) -> (Vec<T>, usize) {
        let all = all.map(Vec::as_slice).unwrap_or(&[]);
        let items: Vec<T> = all
            .iter()
            .skip(edge.offset)
            .take(self.page_size.min(edge.limit))
            .cloned()
            .collect();
        let next = edge.offset + items.len();
        (items, next)
    }
}

impl TreeSource for FakeFs {
    type Branch = Dir;
    type Leaf = FileEntry;
    type Error = String;

    fn branch_key(&self, branch: &Dir) -> String {
        branch.id.clone()
    }

    fn leaf_key(&self, leaf: &FileEntry) -> String {
        leaf.id.clone()
    }

    async fn fetch_branches(
        &self,
        parent: Option<&Dir>,
        edge: EdgeState,
    ) -> Result<FetchPage<Dir>, String> {
        let key = parent
            .map(|d| d.id.clone())
            .unwrap_or_else(|| ROOT_KEY.to_string());
        let (items, next) = self.page(self.dirs.get(&key), &edge);
        Ok(FetchPage::with_page(items, PageUpdate::advance_to(next)))
    }

    async fn fetch_leaves(
        &self,
        parent: Option<&Dir>,
        edge: EdgeState,
    ) -> Result<FetchPage<FileEntry>, String> {
        let key = parent
            .map(|d| d.id.clone())
            .unwrap_or_else(|| ROOT_KEY.to_string());
        let (items, next) = self.page(self.files.get(&key), &edge);
        Ok(FetchPage::with_page(items, PageUpdate::advance_to(next)))
    }

    fn branch_order(&self, a: &Dir, b: &Dir) -> std::cmp::Ordering {
        a.name.cmp(&b.name)
    }

    fn leaf_order(&self, a: &FileEntry, b: &FileEntry) -> std::cmp::Ordering {
        a.name.cmp(&b.name)
    }
}

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let fs = FakeFs::generate();
    let mut tree: Tree<FakeFs> = Tree::new();
    let mut view = TreeViewState::new();
    block_on(tree.load_more(&fs, None)).map_err(io::Error::other)?;
    view.set_cursor(&tree, Some(0));

    let res = run(&mut terminal, &fs, &mut tree, &mut view);

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend<Error = io::Error>>(
    terminal: &mut Terminal<B>,
    fs: &FakeFs,
    tree: &mut Tree<FakeFs>,
    view: &mut TreeViewState,
) -> io::Result<()> {
    let mut activated: Option<String> = None;
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let [main, status] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .areas(area);

            let block = Block::default()
                .title("lazytree (j/k, ←/→, Enter, PgUp/PgDn, g/G, q)")
                .borders(Borders::ALL);
            let inner = block.inner(main);
            f.render_widget(block, main);

            let buf = f.buffer_mut();
            view.render(
                inner,
                buf,
                tree,
                fs,
                |item_area, dir, state, buf| {
                    let marker = if state.is_expanded { "▾ " } else { "▸ " };
                    let line = format!("{marker}{}", dir.name);
                    render_str_clipped(
                        item_area.x,
                        item_area.y,
                        item_area.width,
                        buf,
                        &line,
                        Style::default(),
                    );
                },
                |item_area, file, state, buf| {
                    let tail = if state.is_last && state.has_more {
                        "  …loading"
                    } else {
                        ""
                    };
                    let line = format!("{} ({} B){tail}", file.name, file.size);
                    render_str_clipped(
                        item_area.x,
                        item_area.y,
                        item_area.width,
                        buf,
                        &line,
                        Style::default(),
                    );
                },
            );

            let pct = view.viewport.percent().unwrap_or(0);
            let opened = activated.as_deref().unwrap_or("-");
            let line = format!(
                "rows={}  cursor={}  scroll={pct}%  opened={opened}",
                tree.len(),
                view.cursor().map(|c| c as i64).unwrap_or(-1),
            );
            buf.set_span(status.x, status.y, &Span::styled(line, Style::default()), status.width);
        })?;

        // Viewport feedback: page in whatever the visible slice still needs.
        let targets = tree.prefetch_targets(view.visible_range(tree.len()));
        if !targets.is_empty() {
            block_on(tree.load_many(fs, &targets)).map_err(io::Error::other)?;
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            let event = crossterm::event::read()?;
            if let crossterm::event::Event::Key(key) = &event {
                if key.kind == crossterm::event::KeyEventKind::Press
                    && matches!(key.code, crossterm::event::KeyCode::Char('q'))
                {
                    return Ok(());
                }
            }
            if let Some(ev) = input_event_from_crossterm(event) {
                match view.handle_event(ev, tree, fs) {
                    TreeViewAction::Expanded(dir) => {
                        block_on(tree.load_more(fs, Some(&dir))).map_err(io::Error::other)?;
                    }
                    TreeViewAction::Activated(index) => {
                        activated = tree.node(index).and_then(|n| n.leaf()).map(|l| l.name.clone());
                    }
                    TreeViewAction::Collapsed(_)
                    | TreeViewAction::Redraw
                    | TreeViewAction::None => {}
                }
            }
        }
    }
}
