//! Structural search over token trees
//!
//! Searches return a path of child indices so callers can come back for a
//! mutable borrow once the search itself is over.

use super::token::{Delim, Group, TokenTree};

/// Child indices leading from a root sequence down to a group
pub type GroupPath = Vec<usize>;

/// The `a.b.c` selector chain that ends right before `trees[end]`.
pub fn selector_before(trees: &[TokenTree], end: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut i = end;
    while i > 0 {
        let Some(ident) = trees[i - 1].ident() else {
            break;
        };
        parts.push(ident);
        i -= 1;
        if i >= 2 && trees[i - 1].is_op(".") && trees[i - 2].ident().is_some() {
            i -= 1;
            continue;
        }
        break;
    }
    parts.reverse();
    parts
}

/// Does the chain end with the dotted name (`Provide` or `fx.Provide`)?
pub fn chain_ends_with(chain: &[&str], name: &str) -> bool {
    let wanted: Vec<&str> = name.split('.').collect();
    chain.len() >= wanted.len() && chain[chain.len() - wanted.len()..] == wanted[..]
}

fn find_group(
    trees: &[TokenTree],
    pred: &dyn Fn(&[TokenTree], usize, &Group) -> bool,
) -> Option<GroupPath> {
    for (i, tree) in trees.iter().enumerate() {
        let TokenTree::Group(group) = tree else {
            continue;
        };
        if pred(trees, i, group) {
            return Some(vec![i]);
        }
        if let Some(mut inner) = find_group(&group.trees, pred) {
            inner.insert(0, i);
            return Some(inner);
        }
    }
    None
}

/// First call, outermost first, whose callee selector ends with `callee`.
pub fn find_call(trees: &[TokenTree], callee: &str) -> Option<GroupPath> {
    find_group(trees, &|siblings, i, group| {
        group.delim == Delim::Paren && chain_ends_with(&selector_before(siblings, i), callee)
    })
}

/// First composite literal of the named type (`Widget{...}` or `models.Widget{...}`).
pub fn find_composite(trees: &[TokenTree], type_name: &str) -> Option<GroupPath> {
    find_group(trees, &|siblings, i, group| {
        group.delim == Delim::Brace && chain_ends_with(&selector_before(siblings, i), type_name)
    })
}

pub fn group_at<'a>(mut trees: &'a [TokenTree], path: &[usize]) -> Option<&'a Group> {
    let (last, parents) = path.split_last()?;
    for &i in parents {
        trees = &trees.get(i)?.as_group()?.trees;
    }
    trees.get(*last)?.as_group()
}

pub fn group_at_mut<'a>(mut trees: &'a mut [TokenTree], path: &[usize]) -> Option<&'a mut Group> {
    let (last, parents) = path.split_last()?;
    for &i in parents {
        trees = trees.get_mut(i)?.as_group_mut()?.trees.as_mut_slice();
    }
    trees.get_mut(*last)?.as_group_mut()
}
