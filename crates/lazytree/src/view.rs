use std::ops::Range;

use lazytree_core::DisplayNode;
use lazytree_core::NodeItem;
use lazytree_core::Tree;
use lazytree_core::TreeSource;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;

use crate::input::InputEvent;
use crate::input::KeyEvent;
use crate::input::MouseButton;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::keymap::TreeBindings;
use crate::keymap::TreeCommand;
use crate::render;
use crate::viewport::ViewportState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeViewAction<B> {
    None,
    Redraw,
    /// The branch was expanded; feed it to `Tree::load_more` to fetch its
    /// missing children.
    Expanded(B),
    Collapsed(B),
    /// Enter on a leaf row, reported with its global index.
    Activated(usize),
}

#[derive(Clone, Debug)]
pub struct TreeViewOptions {
    pub branch_height: u16,
    pub leaf_height: u16,
    /// Columns of indentation per depth level.
    pub indent: u16,
    /// Rows added on both sides of the reported visible range, so prefetch
    /// fires slightly before the user reaches the edge.
    pub overscan: usize,
    pub scroll_step: u16,
    pub show_scrollbar: bool,
    pub style: Style,
    pub cursor_style: Style,
    pub scrollbar_style: Style,
}

impl Default for TreeViewOptions {
    fn default() -> Self {
        Self {
            branch_height: 1,
            leaf_height: 1,
            indent: 2,
            overscan: 2,
            scroll_step: 3,
            show_scrollbar: true,
            style: Style::default(),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            scrollbar_style: Style::default(),
        }
    }
}

/// Everything a row renderer gets to know about its row.
#[derive(Clone, Copy, Debug)]
pub struct NodeState {
    pub depth: usize,
    pub has_parent: bool,
    pub is_expanded: bool,
    pub is_first: bool,
    pub is_last: bool,
    pub has_branches: bool,
    pub has_leaves: bool,
    pub has_more: bool,
    pub global_index: usize,
    pub local_index: usize,
    pub is_cursor: bool,
}

/// Windowed view over a [`Tree`]: renders the flattened rows at per-kind
/// heights, owns cursor + scroll state, and reports the visible row range
/// that drives prefetch.
///
/// The view draws no row content itself: callers pass one closure per
/// row kind, mirroring the branch/leaf renderer split of the engine's
/// source boundary.
pub struct TreeViewState {
    pub viewport: ViewportState,
    options: TreeViewOptions,
    bindings: TreeBindings,
    cursor: Option<usize>,
    visible: Range<usize>,
}

impl Default for TreeViewState {
    fn default() -> Self {
        Self {
            viewport: ViewportState::default(),
            options: TreeViewOptions::default(),
            bindings: TreeBindings::default(),
            cursor: None,
            visible: 0..0,
        }
    }
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeViewOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &TreeViewOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TreeViewOptions) {
        self.options = options;
    }

    pub fn bindings_mut(&mut self) -> &mut TreeBindings {
        &mut self.bindings
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn set_cursor<S: TreeSource>(&mut self, tree: &Tree<S>, cursor: Option<usize>) {
        let count = tree.len();
        self.cursor = match cursor {
            Some(_) if count == 0 => None,
            Some(i) => Some(i.min(count - 1)),
            None => None,
        };
        self.ensure_cursor_visible(tree);
    }

    /// The row range on screen after the last render, padded by the
    /// configured overscan. Feed this to `Tree::prefetch_targets`.
    pub fn visible_range(&self, count: usize) -> Range<usize> {
        let start = self.visible.start.saturating_sub(self.options.overscan);
        let end = (self.visible.end + self.options.overscan).min(count);
        start..end.max(start)
    }

    pub fn content_height<S: TreeSource>(&self, tree: &Tree<S>) -> u32 {
        tree.nodes()
            .iter()
            .map(|n| self.height_of(n.is_branch()) as u32)
            .sum()
    }

    pub fn row_offset<S: TreeSource>(&self, tree: &Tree<S>, index: usize) -> u32 {
        tree.nodes()
            .iter()
            .take(index)
            .map(|n| self.height_of(n.is_branch()) as u32)
            .sum()
    }

    pub fn row_at_offset<S: TreeSource>(&self, tree: &Tree<S>, target: u32) -> Option<usize> {
        let mut acc = 0u32;
        for (index, node) in tree.nodes().iter().enumerate() {
            acc += self.height_of(node.is_branch()) as u32;
            if target < acc {
                return Some(index);
            }
        }
        None
    }

    pub fn ensure_cursor_visible<S: TreeSource>(&mut self, tree: &Tree<S>) {
        self.viewport.set_content(self.content_height(tree));
        let Some(cursor) = self.cursor else {
            return;
        };
        let top = self.row_offset(tree, cursor);
        let height = tree
            .node(cursor)
            .map(|n| self.height_of(n.is_branch()))
            .unwrap_or(1) as u32;

        if top < self.viewport.y {
            self.viewport.y = top;
        } else {
            let bottom = top + height;
            let view_bottom = self.viewport.y + self.viewport.viewport_h as u32;
            if bottom > view_bottom {
                self.viewport.y = bottom.saturating_sub(self.viewport.viewport_h as u32);
            }
        }
        self.viewport.clamp();
    }

    pub fn handle_event<S: TreeSource>(
        &mut self,
        event: InputEvent,
        tree: &mut Tree<S>,
        source: &S,
    ) -> TreeViewAction<S::Branch> {
        match event {
            InputEvent::Key(key) => self.handle_key(key, tree, source),
            InputEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.viewport.scroll_by(-(self.options.scroll_step as i32));
                    TreeViewAction::Redraw
                }
                MouseEventKind::ScrollDown => {
                    self.viewport.scroll_by(self.options.scroll_step as i32);
                    TreeViewAction::Redraw
                }
                // Clicks need the rendered area; route them to handle_click.
                MouseEventKind::Down(_) => TreeViewAction::None,
            },
        }
    }

    /// Resolve a click against the area the tree was last rendered into:
    /// the row under the pointer becomes the cursor, and clicking a branch
    /// row toggles it.
    pub fn handle_click<S: TreeSource>(
        &mut self,
        mouse: MouseEvent,
        area: Rect,
        tree: &mut Tree<S>,
        source: &S,
    ) -> TreeViewAction<S::Branch> {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return TreeViewAction::None;
        }
        let inside = mouse.x >= area.x
            && mouse.x < area.x + area.width
            && mouse.y >= area.y
            && mouse.y < area.y + area.height;
        if !inside {
            return TreeViewAction::None;
        }

        let offset = self.viewport.y + (mouse.y - area.y) as u32;
        let Some(index) = self.row_at_offset(tree, offset) else {
            return TreeViewAction::None;
        };
        self.cursor = Some(index);
        match self.toggle_at(index, tree, source) {
            TreeViewAction::Activated(_) => TreeViewAction::Redraw,
            action => action,
        }
    }

    /// Toggle the branch at a row, or report activation for a leaf row.
    pub fn toggle_at<S: TreeSource>(
        &mut self,
        index: usize,
        tree: &mut Tree<S>,
        source: &S,
    ) -> TreeViewAction<S::Branch> {
        let item = match tree.node(index) {
            Some(node) => node.item.clone(),
            None => return TreeViewAction::None,
        };
        match item {
            NodeItem::Branch(branch) => {
                let expanded = tree.toggle(source, &branch);
                self.ensure_cursor_visible(tree);
                if expanded {
                    TreeViewAction::Expanded(branch)
                } else {
                    TreeViewAction::Collapsed(branch)
                }
            }
            NodeItem::Leaf(_) => TreeViewAction::Activated(index),
        }
    }

    pub fn render<S, FB, FL>(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        tree: &Tree<S>,
        source: &S,
        mut render_branch: FB,
        mut render_leaf: FL,
    ) where
        S: TreeSource,
        FB: FnMut(Rect, &S::Branch, &NodeState, &mut Buffer),
        FL: FnMut(Rect, &S::Leaf, &NodeState, &mut Buffer),
    {
        if area.width == 0 || area.height == 0 {
            self.visible = 0..0;
            return;
        }

        let (content_area, scrollbar_x) = if self.options.show_scrollbar && area.width >= 2 {
            (
                Rect::new(area.x, area.y, area.width - 1, area.height),
                Some(area.x + area.width - 1),
            )
        } else {
            (area, None)
        };

        self.viewport.set_viewport(content_area.height);
        self.viewport.set_content(self.content_height(tree));

        buf.set_style(content_area, self.options.style);
        let cursor_style = self.options.style.patch(self.options.cursor_style);

        let mut offset = 0u32;
        let mut first_visible = None;
        let mut last_visible = 0usize;

        for (index, node) in tree.nodes().iter().enumerate() {
            let height = self.height_of(node.is_branch()) as u32;
            let top = offset;
            offset += height;
            if offset <= self.viewport.y {
                continue;
            }

            let rel = top as i64 - self.viewport.y as i64;
            let clip_top = (-rel).max(0) as u32;
            let screen_y = rel.max(0) as u16;
            if screen_y >= content_area.height {
                break;
            }
            let visible_h =
                ((height - clip_top) as u16).min(content_area.height - screen_y);
            if visible_h == 0 {
                continue;
            }

            if first_visible.is_none() {
                first_visible = Some(index);
            }
            last_visible = index;

            let row_area = Rect::new(
                content_area.x,
                content_area.y + screen_y,
                content_area.width,
                visible_h,
            );
            let is_cursor = self.cursor == Some(index);
            if is_cursor {
                buf.set_style(row_area, cursor_style);
            }

            let indent = (node.depth() as u16)
                .saturating_mul(self.options.indent)
                .min(row_area.width.saturating_sub(1));
            let item_area = Rect::new(
                row_area.x + indent,
                row_area.y,
                row_area.width - indent,
                row_area.height,
            );

            let state = self.node_state(tree, source, node, index, is_cursor);
            match &node.item {
                NodeItem::Branch(branch) => render_branch(item_area, branch, &state, buf),
                NodeItem::Leaf(leaf) => render_leaf(item_area, leaf, &state, buf),
            }
        }

        self.visible = match first_visible {
            Some(first) => first..last_visible + 1,
            None => 0..0,
        };

        if let Some(sb_x) = scrollbar_x {
            render::render_scrollbar(
                Rect::new(sb_x, area.y, 1, area.height),
                buf,
                &self.viewport,
                self.options.scrollbar_style,
            );
        }
    }

    fn handle_key<S: TreeSource>(
        &mut self,
        key: KeyEvent,
        tree: &mut Tree<S>,
        source: &S,
    ) -> TreeViewAction<S::Branch> {
        let count = tree.len();
        if count == 0 {
            self.cursor = None;
            self.viewport.y = 0;
            return TreeViewAction::None;
        }

        let Some(command) = self.bindings.command_for(&key) else {
            return TreeViewAction::None;
        };

        match command {
            TreeCommand::Up => self.move_cursor_by(tree, -1),
            TreeCommand::Down => self.move_cursor_by(tree, 1),
            TreeCommand::PageUp => self.move_cursor_by(tree, -(self.page_len() as i64)),
            TreeCommand::PageDown => self.move_cursor_by(tree, self.page_len() as i64),
            TreeCommand::Top => {
                self.set_cursor(tree, Some(0));
                TreeViewAction::Redraw
            }
            TreeCommand::Bottom => {
                self.set_cursor(tree, Some(count - 1));
                TreeViewAction::Redraw
            }
            TreeCommand::Collapse => self.collapse_at_cursor(tree, source),
            TreeCommand::Expand => self.expand_at_cursor(tree, source),
            TreeCommand::Toggle => match self.cursor {
                Some(cursor) => self.toggle_at(cursor, tree, source),
                None => TreeViewAction::None,
            },
        }
    }

    fn move_cursor_by<S: TreeSource>(
        &mut self,
        tree: &Tree<S>,
        delta: i64,
    ) -> TreeViewAction<S::Branch> {
        let count = tree.len();
        let next = match self.cursor {
            Some(cursor) => {
                (cursor as i64 + delta).clamp(0, count.saturating_sub(1) as i64) as usize
            }
            None if delta >= 0 => 0,
            None => count.saturating_sub(1),
        };
        if self.cursor == Some(next) {
            return TreeViewAction::None;
        }
        self.cursor = Some(next);
        self.ensure_cursor_visible(tree);
        TreeViewAction::Redraw
    }

    /// Expand the branch under the cursor; nothing happens on leaves or
    /// already-expanded branches.
    fn expand_at_cursor<S: TreeSource>(
        &mut self,
        tree: &mut Tree<S>,
        source: &S,
    ) -> TreeViewAction<S::Branch> {
        let Some(cursor) = self.cursor else {
            return TreeViewAction::None;
        };
        let branch = match tree.node(cursor).and_then(|n| n.branch()) {
            Some(branch) => branch.clone(),
            None => return TreeViewAction::None,
        };
        if tree.expand(source, &branch) {
            self.ensure_cursor_visible(tree);
            TreeViewAction::Expanded(branch)
        } else {
            TreeViewAction::None
        }
    }

    /// Collapse the expanded branch under the cursor, or jump to the row's
    /// parent when there is nothing to collapse.
    fn collapse_at_cursor<S: TreeSource>(
        &mut self,
        tree: &mut Tree<S>,
        source: &S,
    ) -> TreeViewAction<S::Branch> {
        let Some(cursor) = self.cursor else {
            return TreeViewAction::None;
        };
        let (depth, expanded_branch) = match tree.node(cursor) {
            Some(node) => {
                let expanded = node
                    .branch()
                    .filter(|b| tree.is_expanded(&source.branch_key(b)))
                    .cloned();
                (node.depth(), expanded)
            }
            None => return TreeViewAction::None,
        };

        if let Some(branch) = expanded_branch {
            tree.collapse(source, &branch);
            self.ensure_cursor_visible(tree);
            return TreeViewAction::Collapsed(branch);
        }

        if depth == 0 {
            return TreeViewAction::None;
        }
        for index in (0..cursor).rev() {
            if let Some(node) = tree.node(index) {
                if node.is_branch() && node.depth() + 1 == depth {
                    self.cursor = Some(index);
                    self.ensure_cursor_visible(tree);
                    return TreeViewAction::Redraw;
                }
            }
        }
        TreeViewAction::None
    }

    fn node_state<S: TreeSource>(
        &self,
        tree: &Tree<S>,
        source: &S,
        node: &DisplayNode<S::Branch, S::Leaf>,
        index: usize,
        is_cursor: bool,
    ) -> NodeState {
        let is_expanded = node
            .branch()
            .is_some_and(|b| tree.is_expanded(&source.branch_key(b)));
        NodeState {
            depth: node.depth(),
            has_parent: node.has_parent(),
            is_expanded,
            is_first: node.is_first,
            is_last: node.is_last,
            has_branches: node.has_branches,
            has_leaves: node.has_leaves,
            has_more: node.has_more,
            global_index: index,
            local_index: node.local_index,
            is_cursor,
        }
    }

    fn page_len(&self) -> usize {
        (self.visible.end.saturating_sub(self.visible.start)).max(1)
    }

    fn height_of(&self, is_branch: bool) -> u16 {
        let height = if is_branch {
            self.options.branch_height
        } else {
            self.options.leaf_height
        };
        height.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use lazytree_core::EdgeState;
    use lazytree_core::FetchPage;

    struct Demo;

    impl TreeSource for Demo {
        type Branch = &'static str;
        type Leaf = &'static str;
        type Error = ();

        fn branch_key(&self, branch: &Self::Branch) -> String {
            (*branch).to_string()
        }

        fn leaf_key(&self, leaf: &Self::Leaf) -> String {
            (*leaf).to_string()
        }

        async fn fetch_branches(
            &self,
            _parent: Option<&Self::Branch>,
            _edge: EdgeState,
        ) -> Result<FetchPage<Self::Branch>, Self::Error> {
            Ok(FetchPage::empty())
        }

        async fn fetch_leaves(
            &self,
            _parent: Option<&Self::Branch>,
            _edge: EdgeState,
        ) -> Result<FetchPage<Self::Leaf>, Self::Error> {
            Ok(FetchPage::empty())
        }
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    fn draw(view: &mut TreeViewState, tree: &Tree<Demo>, w: u16, h: u16) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, w, h));
        view.render(
            Rect::new(0, 0, w, h),
            &mut buf,
            tree,
            &Demo,
            |area, branch, _state, buf| {
                render::render_str_clipped(area.x, area.y, area.width, buf, branch, Style::default());
            },
            |area, leaf, _state, buf| {
                render::render_str_clipped(area.x, area.y, area.width, buf, leaf, Style::default());
            },
        );
        buf
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        let w = buf.area.width;
        (0..w)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn flat_tree(count: usize) -> Tree<Demo> {
        let labels: &[&'static str] = &[
            "l0", "l1", "l2", "l3", "l4", "l5", "l6", "l7", "l8", "l9",
        ];
        let mut tree: Tree<Demo> = Tree::new();
        tree.batch(&Demo, |tree| {
            for leaf in &labels[..count] {
                tree.insert_leaf(&Demo, *leaf, None);
            }
        });
        tree
    }

    #[test]
    fn cursor_moves_and_stays_visible() {
        let mut tree = flat_tree(10);
        let mut view = TreeViewState::new();
        draw(&mut view, &tree, 10, 3);
        view.set_cursor(&tree, Some(0));

        view.handle_event(key(KeyCode::Down), &mut tree, &Demo);
        view.handle_event(key(KeyCode::Down), &mut tree, &Demo);
        view.handle_event(key(KeyCode::Down), &mut tree, &Demo);
        assert_eq!(view.cursor(), Some(3));
        assert_eq!(view.viewport.y, 1);

        view.handle_event(key(KeyCode::End), &mut tree, &Demo);
        assert_eq!(view.cursor(), Some(9));
        assert_eq!(view.viewport.y, 7);
    }

    #[test]
    fn toggle_reports_expansion_with_the_branch() {
        let mut tree: Tree<Demo> = Tree::new();
        tree.insert_branch(&Demo, "dir", None);
        tree.insert_leaf(&Demo, "file", Some(&"dir"));

        let mut view = TreeViewState::new();
        draw(&mut view, &tree, 10, 5);
        view.set_cursor(&tree, Some(0));

        let action = view.handle_event(key(KeyCode::Enter), &mut tree, &Demo);
        assert_eq!(action, TreeViewAction::Expanded("dir"));
        assert_eq!(tree.len(), 2);

        let action = view.handle_event(key(KeyCode::Enter), &mut tree, &Demo);
        assert_eq!(action, TreeViewAction::Collapsed("dir"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn enter_on_a_leaf_activates_it() {
        let mut tree = flat_tree(3);
        let mut view = TreeViewState::new();
        draw(&mut view, &tree, 10, 5);
        view.set_cursor(&tree, Some(2));

        let action = view.handle_event(key(KeyCode::Enter), &mut tree, &Demo);
        assert_eq!(action, TreeViewAction::Activated(2));
    }

    #[test]
    fn render_draws_rows_and_reports_the_visible_range() {
        let tree = flat_tree(10);
        let mut view = TreeViewState::with_options(TreeViewOptions {
            show_scrollbar: false,
            overscan: 0,
            ..TreeViewOptions::default()
        });
        let buf = draw(&mut view, &tree, 10, 3);

        assert_eq!(row_text(&buf, 0), "l0");
        assert_eq!(row_text(&buf, 2), "l2");
        assert_eq!(view.visible_range(tree.len()), 0..3);

        view.viewport.scroll_by(4);
        let buf = draw(&mut view, &tree, 10, 3);
        assert_eq!(row_text(&buf, 0), "l4");
        assert_eq!(view.visible_range(tree.len()), 4..7);
    }

    #[test]
    fn overscan_pads_the_reported_range() {
        let tree = flat_tree(10);
        let mut view = TreeViewState::new(); // overscan 2
        draw(&mut view, &tree, 10, 3);
        view.viewport.scroll_by(4);
        draw(&mut view, &tree, 10, 3);
        assert_eq!(view.visible_range(tree.len()), 2..9);
    }

    #[test]
    fn rows_indent_by_depth() {
        let mut tree: Tree<Demo> = Tree::new();
        tree.insert_branch(&Demo, "dir", None);
        tree.insert_leaf(&Demo, "file", Some(&"dir"));
        tree.expand(&Demo, &"dir");

        let mut view = TreeViewState::with_options(TreeViewOptions {
            show_scrollbar: false,
            ..TreeViewOptions::default()
        });
        let buf = draw(&mut view, &tree, 10, 3);
        assert_eq!(row_text(&buf, 0), "dir");
        assert_eq!(row_text(&buf, 1), "  file");
    }

    #[test]
    fn per_kind_heights_shift_row_geometry() {
        let mut tree: Tree<Demo> = Tree::new();
        tree.insert_branch(&Demo, "dir", None);
        tree.insert_leaf(&Demo, "f1", Some(&"dir"));
        tree.insert_leaf(&Demo, "f2", Some(&"dir"));
        tree.expand(&Demo, &"dir");

        let view = TreeViewState::with_options(TreeViewOptions {
            branch_height: 2,
            ..TreeViewOptions::default()
        });
        assert_eq!(view.content_height(&tree), 4);
        assert_eq!(view.row_offset(&tree, 1), 2);
        assert_eq!(view.row_at_offset(&tree, 1), Some(0));
        assert_eq!(view.row_at_offset(&tree, 3), Some(2));
        assert_eq!(view.row_at_offset(&tree, 4), None);
    }

    #[test]
    fn click_selects_and_toggles_branch_rows() {
        let mut tree: Tree<Demo> = Tree::new();
        tree.insert_branch(&Demo, "dir", None);
        tree.insert_leaf(&Demo, "file", Some(&"dir"));

        let mut view = TreeViewState::new();
        let area = Rect::new(0, 0, 10, 5);
        draw(&mut view, &tree, 10, 5);

        let click = MouseEvent {
            x: 1,
            y: 0,
            kind: MouseEventKind::Down(MouseButton::Left),
            modifiers: Default::default(),
        };
        let action = view.handle_click(click, area, &mut tree, &Demo);
        assert_eq!(action, TreeViewAction::Expanded("dir"));
        assert_eq!(view.cursor(), Some(0));

        // Clicking below the last row does nothing.
        let miss = MouseEvent {
            x: 1,
            y: 4,
            kind: MouseEventKind::Down(MouseButton::Left),
            modifiers: Default::default(),
        };
        let action = view.handle_click(miss, area, &mut tree, &Demo);
        assert_eq!(action, TreeViewAction::None);
    }

    #[test]
    fn wheel_scrolls_without_moving_the_cursor() {
        let mut tree = flat_tree(10);
        let mut view = TreeViewState::new();
        draw(&mut view, &tree, 10, 3);
        view.set_cursor(&tree, Some(0));

        let scroll = InputEvent::Mouse(MouseEvent {
            x: 0,
            y: 0,
            kind: MouseEventKind::ScrollDown,
            modifiers: Default::default(),
        });
        let action = view.handle_event(scroll, &mut tree, &Demo);
        assert_eq!(action, TreeViewAction::Redraw);
        assert_eq!(view.viewport.y, 3);
        assert_eq!(view.cursor(), Some(0));
    }

    #[test]
    fn left_collapses_then_jumps_to_parent() {
        let mut tree: Tree<Demo> = Tree::new();
        tree.insert_branch(&Demo, "dir", None);
        tree.insert_branch(&Demo, "sub", Some(&"dir"));
        tree.insert_leaf(&Demo, "file", Some(&"sub"));
        tree.expand(&Demo, &"dir");
        tree.expand(&Demo, &"sub");
        assert_eq!(tree.len(), 3);

        let mut view = TreeViewState::new();
        draw(&mut view, &tree, 12, 5);
        view.set_cursor(&tree, Some(2)); // the leaf

        // Leaf rows jump to their parent branch.
        let action = view.handle_event(key(KeyCode::Left), &mut tree, &Demo);
        assert_eq!(action, TreeViewAction::Redraw);
        assert_eq!(view.cursor(), Some(1));

        // An expanded branch collapses in place.
        let action = view.handle_event(key(KeyCode::Left), &mut tree, &Demo);
        assert_eq!(action, TreeViewAction::Collapsed("sub"));
        assert_eq!(tree.len(), 2);
    }
}
