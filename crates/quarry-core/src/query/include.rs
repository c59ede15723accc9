//! Include path resolution.

use crate::error::AppError;
use crate::result::AppResult;
use crate::traits::entity::{EntityDescriptor, NavigationDef};

/// A set of include paths merged into a tree rooted at one entity type.
///
/// `["items", "items.product", "customer"]` resolves to two root nodes,
/// `items` (with a nested `product`) and `customer`.
#[derive(Debug, Default)]
pub struct IncludeTree {
    /// Top-level navigations, in first-seen order.
    pub nodes: Vec<IncludeNode>,
}

/// One navigation to materialize together with its nested includes.
#[derive(Debug)]
pub struct IncludeNode {
    /// The navigation on the owning entity.
    pub navigation: &'static NavigationDef,
    /// Navigations to materialize on the related entities.
    pub children: Vec<IncludeNode>,
}

impl IncludeTree {
    /// Resolve dotted `paths` against `root`.
    ///
    /// Fails with `InvalidArgument` on an empty segment, a segment with
    /// surrounding whitespace, or a segment that names no navigation of the
    /// entity it is applied to.
    pub fn resolve<S: AsRef<str>>(root: &'static EntityDescriptor, paths: &[S]) -> AppResult<Self> {
        let mut tree = Self::default();
        for path in paths {
            let path = path.as_ref();
            let mut descriptor = root;
            let mut level = &mut tree.nodes;
            for segment in path.split('.') {
                if segment.is_empty() || segment.trim() != segment {
                    return Err(AppError::invalid_argument(format!(
                        "Include path '{path}' has an empty or padded segment"
                    )));
                }
                let navigation = descriptor.navigation(segment).ok_or_else(|| {
                    AppError::invalid_argument(format!(
                        "'{}' has no navigation '{segment}' (include path '{path}')",
                        descriptor.name
                    ))
                })?;

                let index = match level
                    .iter()
                    .position(|node| node.navigation.name == navigation.name)
                {
                    Some(index) => index,
                    None => {
                        level.push(IncludeNode {
                            navigation,
                            children: Vec::new(),
                        });
                        level.len() - 1
                    }
                };
                descriptor = navigation.target();
                level = &mut level[index].children;
            }
        }
        Ok(tree)
    }

    /// Whether there is nothing to materialize.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
