//! Drives a tree against a paged in-memory source and prints the
//! flattened sequence after each load round.

use std::collections::HashMap;

use futures::executor::block_on;
use lazytree_core::EdgeState;
use lazytree_core::FetchPage;
use lazytree_core::NodeItem;
use lazytree_core::PageUpdate;
use lazytree_core::Tree;
use lazytree_core::TreeSource;
use lazytree_core::ROOT_KEY;

struct Catalog {
    sections: HashMap<String, Vec<String>>,
    entries: HashMap<String, Vec<String>>,
    page_size: usize,
}

impl TreeSource for Catalog {
    type Branch = String;
    type Leaf = String;
    type Error = String;

    fn branch_key(&self, branch: &String) -> String {
        branch.clone()
    }

    fn leaf_key(&self, leaf: &String) -> String {
        leaf.clone()
    }

    async fn fetch_branches(
        &self,
        parent: Option<&String>,
        edge: EdgeState,
    ) -> Result<FetchPage<String>, String> {
        let key = parent.cloned().unwrap_or_else(|| ROOT_KEY.to_string());
        let all = self.sections.get(&key).cloned().unwrap_or_default();
        let items: Vec<String> = all.into_iter().skip(edge.offset).take(self.page_size).collect();
        let next = edge.offset + items.len();
        Ok(FetchPage::with_page(items, PageUpdate::advance_to(next)))
    }

    async fn fetch_leaves(
        &self,
        parent: Option<&String>,
        edge: EdgeState,
    ) -> Result<FetchPage<String>, String> {
        let key = parent.cloned().unwrap_or_else(|| ROOT_KEY.to_string());
        let all = self.entries.get(&key).cloned().unwrap_or_default();
        let items: Vec<String> = all.into_iter().skip(edge.offset).take(self.page_size).collect();
        let next = edge.offset + items.len();
        Ok(FetchPage::with_page(items, PageUpdate::advance_to(next)))
    }
}

fn dump<S: TreeSource>(tree: &Tree<S>)
where
    S::Branch: std::fmt::Display,
    S::Leaf: std::fmt::Display,
{
    for node in tree.nodes() {
        let indent = "  ".repeat(node.depth());
        match &node.item {
            NodeItem::Branch(b) => println!("{indent}+ {b}"),
            NodeItem::Leaf(l) => {
                let more = if node.is_last && node.has_more { " …" } else { "" };
                println!("{indent}- {l}{more}");
            }
        }
    }
}

fn main() -> Result<(), String> {
    let mut sections = HashMap::new();
    sections.insert(
        ROOT_KEY.to_string(),
        vec!["rust".to_string(), "zig".to_string()],
    );
    let mut entries = HashMap::new();
    entries.insert(
        "rust".to_string(),
        (1..=5).map(|i| format!("rust-{i:02}")).collect(),
    );

    let catalog = Catalog {
        sections,
        entries,
        page_size: 2,
    };
    let mut tree: Tree<Catalog> = Tree::new();

    block_on(tree.load_more(&catalog, None))?;
    println!("after root load:");
    dump(&tree);

    tree.expand(&catalog, &"rust".to_string());
    block_on(tree.load_more(&catalog, Some(&"rust".to_string())))?;
    println!("\nafter expanding rust:");
    dump(&tree);

    // Keep feeding the viewport feedback until everything on screen is
    // backed by complete edges.
    loop {
        let targets = tree.prefetch_targets(0..tree.len());
        if targets.is_empty() || !block_on(tree.load_many(&catalog, &targets))? {
            break;
        }
        println!("\nafter a prefetch round:");
        dump(&tree);
    }

    Ok(())
}
