//! Menu Context - 树操作
//!
//! 全部为纯函数：输入一棵树，返回一棵新树，原树不变。
//! 对不存在的 dynamic_id 返回 `MenuError::NodeNotFound`，调用方忽略错误即等同于空操作。

use std::collections::{HashMap, HashSet};

use super::{
    DropPosition, DynamicId, DynamicIdSequence, FlatMenuNode, LinkTarget, MenuError,
    MenuItemPayload, MenuLink, MenuNode, MenuNodeDraft, MenuPatch,
};

/// 拖放请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    /// 被拖动的节点
    pub drag: DynamicId,
    /// 放置目标节点
    pub drop: DynamicId,
    pub position: DropPosition,
    /// 是否放在两个节点之间的缝隙上
    pub drop_to_gap: bool,
    /// 目标节点当前是否展开
    pub target_expanded: bool,
}

impl MoveRequest {
    pub fn onto(drag: DynamicId, drop: DynamicId) -> Self {
        Self {
            drag,
            drop,
            position: DropPosition::Onto,
            drop_to_gap: false,
            target_expanded: false,
        }
    }

    pub fn before(drag: DynamicId, drop: DynamicId) -> Self {
        Self {
            drag,
            drop,
            position: DropPosition::Before,
            drop_to_gap: true,
            target_expanded: false,
        }
    }

    pub fn after(drag: DynamicId, drop: DynamicId) -> Self {
        Self {
            drag,
            drop,
            position: DropPosition::After,
            drop_to_gap: true,
            target_expanded: false,
        }
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.target_expanded = expanded;
        self
    }
}

/// 拖放结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub tree: Vec<MenuNode>,
    /// 移动后的节点（parent 已更新）
    pub moved: MenuNode,
}

/// 扁平列表 -> 树
///
/// 从第一个 depth == 1 的节点的 parent_id 开始，按 parent_id 递归分组，
/// 每组内保持扁平列表中的相对顺序。dynamic_id 按先序遍历分配。
pub fn hydrate(flat: &[FlatMenuNode], ids: &mut DynamicIdSequence) -> Vec<MenuNode> {
    if flat.is_empty() {
        return Vec::new();
    }

    let root_parent = root_parent_id(flat);

    let mut partitions: HashMap<Option<i64>, Vec<&FlatMenuNode>> = HashMap::new();
    for item in flat {
        partitions.entry(item.parent_id).or_default().push(item);
    }

    let mut visited = HashSet::with_capacity(flat.len());
    let tree = build_level(&partitions, root_parent, None, ids, &mut visited);

    let skipped = flat.len().saturating_sub(visited.len());
    if skipped > 0 {
        tracing::warn!(
            skipped = skipped,
            total = flat.len(),
            "Menu rows unreachable from the root were skipped"
        );
    }

    tree
}

fn root_parent_id(flat: &[FlatMenuNode]) -> Option<i64> {
    flat.iter()
        .find(|item| item.depth == 1)
        .or_else(|| flat.iter().min_by_key(|item| item.depth))
        .and_then(|item| item.parent_id)
}

fn build_level(
    partitions: &HashMap<Option<i64>, Vec<&FlatMenuNode>>,
    parent_key: Option<i64>,
    parent: Option<DynamicId>,
    ids: &mut DynamicIdSequence,
    visited: &mut HashSet<i64>,
) -> Vec<MenuNode> {
    let Some(items) = partitions.get(&parent_key) else {
        return Vec::new();
    };

    let mut level = Vec::with_capacity(items.len());
    for item in items {
        // 重复 id 或环
        if !visited.insert(item.id) {
            continue;
        }

        let dynamic_id = ids.next_id();
        let children = build_level(partitions, Some(item.id), Some(dynamic_id), ids, visited);

        level.push(MenuNode {
            id: Some(item.id),
            dynamic_id,
            parent,
            title: item.title.clone(),
            link: MenuLink::from_wire(item.kind.as_deref(), item.link.clone(), item.reference_id),
            target: LinkTarget::from_wire(item.target.as_deref()),
            css_class: item.css_class.clone(),
            icon: item.icon.clone(),
            rel: item.rel.clone(),
            download: item.download,
            children,
        });
    }
    level
}

/// 追加一个新的根节点
pub fn append(
    tree: &[MenuNode],
    draft: MenuNodeDraft,
    ids: &mut DynamicIdSequence,
) -> (Vec<MenuNode>, DynamicId) {
    let dynamic_id = ids.next_id();
    let mut next = tree.to_vec();
    next.push(MenuNode::from_draft(dynamic_id, draft));
    (next, dynamic_id)
}

/// 拖放移动
///
/// 放置规则:
/// 1. 不在缝隙上：成为目标的第一个子节点
/// 2. 在缝隙上、目标已展开且有子节点、位置在下方：同样成为第一个子节点
/// 3. 其余情况：作为目标的兄弟节点，Before 插在前面，否则插在后面
pub fn move_node(tree: &[MenuNode], request: &MoveRequest) -> Result<MoveOutcome, MenuError> {
    let drag = find_node(tree, request.drag).ok_or(MenuError::NodeNotFound(request.drag))?;
    let drop_node = find_node(tree, request.drop).ok_or(MenuError::NodeNotFound(request.drop))?;
    if drag.contains(request.drop) {
        return Err(MenuError::InvalidMove(format!(
            "node {} cannot be dropped on itself or its own descendant {}",
            request.drag, request.drop
        )));
    }

    // 按拖拽开始时的子节点判断，拖走唯一子节点也算有子节点
    let into_first_child = !request.drop_to_gap
        || (request.target_expanded
            && drop_node.has_children()
            && request.position == DropPosition::After);

    let mut next = tree.to_vec();
    let mut dragged =
        take_node(&mut next, request.drag).ok_or(MenuError::NodeNotFound(request.drag))?;

    let target = find_node_mut(&mut next, request.drop)
        .ok_or(MenuError::NodeNotFound(request.drop))?;

    if into_first_child {
        dragged.parent = Some(target.dynamic_id);
        target.children.insert(0, dragged.clone());
    } else {
        let after = request.position != DropPosition::Before;
        let mut pending = Some(dragged.clone());
        insert_beside(&mut next, None, request.drop, &mut pending, after);
        // insert_beside 已把 parent 写入树中的副本，这里同步给返回值
        dragged.parent = parent_of(&next, request.drag).flatten();
    }

    Ok(MoveOutcome {
        tree: next,
        moved: dragged,
    })
}

/// 编辑节点字段
pub fn edit(tree: &[MenuNode], id: DynamicId, patch: &MenuPatch) -> Result<Vec<MenuNode>, MenuError> {
    let mut next = tree.to_vec();
    let node = find_node_mut(&mut next, id).ok_or(MenuError::NodeNotFound(id))?;
    patch.apply_to(node);
    Ok(next)
}

/// 删除节点及其整棵子树
pub fn delete(tree: &[MenuNode], id: DynamicId) -> Result<Vec<MenuNode>, MenuError> {
    if find_node(tree, id).is_none() {
        return Err(MenuError::NodeNotFound(id));
    }
    Ok(filter_out(tree, id))
}

fn filter_out(nodes: &[MenuNode], id: DynamicId) -> Vec<MenuNode> {
    nodes
        .iter()
        .filter(|node| node.dynamic_id != id)
        .map(|node| {
            let mut kept = node.without_children();
            kept.children = filter_out(&node.children, id);
            kept
        })
        .collect()
}

/// 树 -> 保存用的嵌套结构
pub fn flatten(tree: &[MenuNode]) -> Vec<MenuItemPayload> {
    tree.iter().map(MenuItemPayload::from).collect()
}

/// 深度优先查找
pub fn find_node(nodes: &[MenuNode], id: DynamicId) -> Option<&MenuNode> {
    nodes.iter().find_map(|node| {
        if node.dynamic_id == id {
            Some(node)
        } else {
            find_node(&node.children, id)
        }
    })
}

fn find_node_mut(nodes: &mut [MenuNode], id: DynamicId) -> Option<&mut MenuNode> {
    nodes.iter_mut().find_map(|node| {
        if node.dynamic_id == id {
            Some(node)
        } else {
            find_node_mut(&mut node.children, id)
        }
    })
}

/// 节点的父节点：外层 None 表示节点不存在，内层 None 表示根节点
pub fn parent_of(nodes: &[MenuNode], id: DynamicId) -> Option<Option<DynamicId>> {
    fn walk(nodes: &[MenuNode], parent: Option<DynamicId>, id: DynamicId) -> Option<Option<DynamicId>> {
        nodes.iter().find_map(|node| {
            if node.dynamic_id == id {
                Some(parent)
            } else {
                walk(&node.children, Some(node.dynamic_id), id)
            }
        })
    }
    walk(nodes, None, id)
}

/// 全部节点数
pub fn node_count(nodes: &[MenuNode]) -> usize {
    nodes.iter().map(|node| 1 + node.descendant_count()).sum()
}

/// 先序遍历收集所有 dynamic_id
pub fn collect_ids(nodes: &[MenuNode]) -> Vec<DynamicId> {
    let mut ids = Vec::new();
    fn walk(nodes: &[MenuNode], ids: &mut Vec<DynamicId>) {
        for node in nodes {
            ids.push(node.dynamic_id);
            walk(&node.children, ids);
        }
    }
    walk(nodes, &mut ids);
    ids
}

fn take_node(nodes: &mut Vec<MenuNode>, id: DynamicId) -> Option<MenuNode> {
    if let Some(index) = nodes.iter().position(|node| node.dynamic_id == id) {
        return Some(nodes.remove(index));
    }
    for node in nodes.iter_mut() {
        if let Some(found) = take_node(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn insert_beside(
    nodes: &mut Vec<MenuNode>,
    parent: Option<DynamicId>,
    target: DynamicId,
    pending: &mut Option<MenuNode>,
    after: bool,
) -> bool {
    if let Some(index) = nodes.iter().position(|node| node.dynamic_id == target) {
        if let Some(mut node) = pending.take() {
            node.parent = parent;
            let at = if after { index + 1 } else { index };
            nodes.insert(at, node);
        }
        return true;
    }
    for node in nodes.iter_mut() {
        let id = node.dynamic_id;
        if insert_beside(&mut node.children, Some(id), target, pending, after) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(id: i64, parent_id: Option<i64>, depth: u32) -> FlatMenuNode {
        let mut node = FlatMenuNode::new(id, parent_id, depth, format!("item-{}", id));
        node.kind = Some("custom".into());
        node.link = Some(format!("/item-{}", id));
        node
    }

    fn dyn_id(value: u64) -> DynamicId {
        DynamicId::new(value)
    }

    fn titles(nodes: &[MenuNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.title.as_str()).collect()
    }

    /// A(1) -> [B(2)], C(3)
    fn sample_tree() -> (Vec<MenuNode>, DynamicIdSequence) {
        let mut ids = DynamicIdSequence::new();
        let rows = vec![flat(10, Some(0), 1), flat(20, Some(10), 2), flat(30, Some(0), 1)];
        let tree = hydrate(&rows, &mut ids);
        (tree, ids)
    }

    /// 结构上的 (节点 -> 父节点) 映射
    fn structural_parents(nodes: &[MenuNode]) -> HashMap<DynamicId, Option<DynamicId>> {
        let mut map = HashMap::new();
        fn walk(nodes: &[MenuNode], parent: Option<DynamicId>, map: &mut HashMap<DynamicId, Option<DynamicId>>) {
            for node in nodes {
                map.insert(node.dynamic_id, parent);
                walk(&node.children, Some(node.dynamic_id), map);
            }
        }
        walk(nodes, None, &mut map);
        map
    }

    /// parent 字段必须与实际位置一致
    fn assert_parents_consistent(nodes: &[MenuNode]) {
        fn walk(nodes: &[MenuNode], parent: Option<DynamicId>) {
            for node in nodes {
                assert_eq!(node.parent, parent, "node {} has stale parent", node.dynamic_id);
                walk(&node.children, Some(node.dynamic_id));
            }
        }
        walk(nodes, None);
    }

    #[test]
    fn test_hydrate_empty() {
        let mut ids = DynamicIdSequence::new();
        assert!(hydrate(&[], &mut ids).is_empty());
        assert_eq!(ids.peek(), dyn_id(1));
    }

    #[test]
    fn test_hydrate_groups_by_parent_in_order() {
        let (tree, _) = sample_tree();

        assert_eq!(titles(&tree), vec!["item-10", "item-30"]);
        assert_eq!(tree[0].dynamic_id, dyn_id(1));
        assert_eq!(tree[0].children[0].dynamic_id, dyn_id(2));
        assert_eq!(tree[1].dynamic_id, dyn_id(3));
        assert_eq!(tree[0].children[0].parent, Some(dyn_id(1)));
        // 叶子没有 children
        assert!(tree[1].children.is_empty());
        assert_parents_consistent(&tree);
    }

    #[test]
    fn test_hydrate_keeps_flat_order_when_children_come_first() {
        let mut ids = DynamicIdSequence::new();
        let rows = vec![
            flat(3, Some(1), 2),
            flat(1, None, 1),
            flat(4, Some(1), 2),
            flat(2, None, 1),
        ];

        let tree = hydrate(&rows, &mut ids);
        assert_eq!(titles(&tree), vec!["item-1", "item-2"]);
        assert_eq!(titles(&tree[0].children), vec!["item-3", "item-4"]);
        assert_eq!(node_count(&tree), 4);
    }

    #[test]
    fn test_hydrate_skips_unreachable_rows() {
        let mut ids = DynamicIdSequence::new();
        let rows = vec![flat(1, None, 1), flat(2, Some(99), 2)];

        let tree = hydrate(&rows, &mut ids);
        assert_eq!(node_count(&tree), 1);
    }

    #[test]
    fn test_hydrate_maps_reference_links() {
        let mut ids = DynamicIdSequence::new();
        let mut row = flat(1, None, 1);
        row.kind = Some("page".into());
        row.reference_id = Some(42);
        row.target = Some("_blank".into());

        let tree = hydrate(&[row], &mut ids);
        assert_eq!(tree[0].link.reference_id(), Some(42));
        assert_eq!(tree[0].link.type_name(), "page");
        assert_eq!(tree[0].target, LinkTarget::NewWindow);
    }

    #[test]
    fn test_append_adds_root_with_fresh_id() {
        let (tree, mut ids) = sample_tree();
        let draft = MenuNodeDraft::new("Contact", MenuLink::custom("/contact"));

        let (next, id) = append(&tree, draft, &mut ids);
        assert_eq!(id, dyn_id(4));
        assert_eq!(titles(&next), vec!["item-10", "item-30", "Contact"]);
        assert_eq!(next[2].id, None);
        assert_eq!(next[2].parent, None);
        // 原树不变
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_move_onto_node_becomes_first_child() {
        // A(1) -> [B(2)], C(3)；把 C 拖到 A 上
        let (tree, _) = sample_tree();

        let outcome = move_node(&tree, &MoveRequest::onto(dyn_id(3), dyn_id(1))).unwrap();
        assert_eq!(titles(&outcome.tree), vec!["item-10"]);
        assert_eq!(titles(&outcome.tree[0].children), vec!["item-30", "item-20"]);
        assert_eq!(outcome.moved.parent, Some(dyn_id(1)));
        assert_parents_consistent(&outcome.tree);
    }

    #[test]
    fn test_move_before_and_after_sibling() {
        let (tree, _) = sample_tree();

        let before = move_node(&tree, &MoveRequest::before(dyn_id(3), dyn_id(1))).unwrap();
        assert_eq!(titles(&before.tree), vec!["item-30", "item-10"]);
        assert_eq!(before.moved.parent, None);

        let after = move_node(&tree, &MoveRequest::after(dyn_id(3), dyn_id(2))).unwrap();
        assert_eq!(titles(&after.tree), vec!["item-10"]);
        assert_eq!(titles(&after.tree[0].children), vec!["item-20", "item-30"]);
        assert_eq!(after.moved.parent, Some(dyn_id(1)));
        assert_parents_consistent(&after.tree);
    }

    #[test]
    fn test_move_below_expanded_parent_becomes_first_child() {
        let (tree, _) = sample_tree();

        let request = MoveRequest::after(dyn_id(3), dyn_id(1)).expanded(true);
        let outcome = move_node(&tree, &request).unwrap();
        assert_eq!(titles(&outcome.tree[0].children), vec!["item-30", "item-20"]);

        // 未展开时作为兄弟节点
        let collapsed = move_node(&tree, &MoveRequest::after(dyn_id(3), dyn_id(1))).unwrap();
        assert_eq!(titles(&collapsed.tree), vec!["item-10", "item-30"]);
    }

    #[test]
    fn test_move_only_child_below_expanded_parent_stays_child() {
        // B 是 A 的唯一子节点，拖到展开的 A 下方缝隙
        let (tree, _) = sample_tree();

        let request = MoveRequest::after(dyn_id(2), dyn_id(1)).expanded(true);
        let outcome = move_node(&tree, &request).unwrap();
        assert_eq!(titles(&outcome.tree), vec!["item-10", "item-30"]);
        assert_eq!(titles(&outcome.tree[0].children), vec!["item-20"]);
        assert_eq!(outcome.moved.parent, Some(dyn_id(1)));
        assert_parents_consistent(&outcome.tree);
    }

    #[test]
    fn test_move_in_gap_with_onto_position_inserts_after() {
        let (tree, _) = sample_tree();
        let request = MoveRequest {
            drag: dyn_id(1),
            drop: dyn_id(3),
            position: DropPosition::Onto,
            drop_to_gap: true,
            target_expanded: false,
        };

        let outcome = move_node(&tree, &request).unwrap();
        assert_eq!(titles(&outcome.tree), vec!["item-30", "item-10"]);
    }

    #[test]
    fn test_move_keeps_subtree_and_changes_one_parent() {
        let mut ids = DynamicIdSequence::new();
        let rows = vec![
            flat(1, None, 1),
            flat(2, Some(1), 2),
            flat(3, Some(2), 3),
            flat(4, Some(2), 3),
            flat(5, None, 1),
        ];
        let tree = hydrate(&rows, &mut ids);
        let before = structural_parents(&tree);
        let moving = find_node(&tree, dyn_id(2)).unwrap().clone();

        let outcome = move_node(&tree, &MoveRequest::onto(dyn_id(2), dyn_id(5))).unwrap();
        let after = structural_parents(&outcome.tree);

        assert_eq!(node_count(&outcome.tree), node_count(&tree));
        let changed: Vec<_> = before
            .iter()
            .filter(|(id, parent)| after.get(id) != Some(parent))
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(changed, vec![dyn_id(2)]);

        let moved = find_node(&outcome.tree, dyn_id(2)).unwrap();
        assert_eq!(moved.children, moving.children);
        assert_eq!(moved.parent, Some(dyn_id(5)));
    }

    #[test]
    fn test_move_into_own_subtree_is_rejected() {
        let (tree, _) = sample_tree();

        let err = move_node(&tree, &MoveRequest::onto(dyn_id(1), dyn_id(2))).unwrap_err();
        assert!(matches!(err, MenuError::InvalidMove(_)));

        let err = move_node(&tree, &MoveRequest::onto(dyn_id(1), dyn_id(1))).unwrap_err();
        assert!(matches!(err, MenuError::InvalidMove(_)));
    }

    #[test]
    fn test_move_unknown_node() {
        let (tree, _) = sample_tree();

        let err = move_node(&tree, &MoveRequest::onto(dyn_id(99), dyn_id(1))).unwrap_err();
        assert_eq!(err, MenuError::NodeNotFound(dyn_id(99)));

        let err = move_node(&tree, &MoveRequest::onto(dyn_id(1), dyn_id(98))).unwrap_err();
        assert_eq!(err, MenuError::NodeNotFound(dyn_id(98)));
    }

    #[test]
    fn test_edit_nested_node() {
        let (tree, _) = sample_tree();
        let patch = MenuPatch::new().title("Team").rel(Some("nofollow".into())).download(true);

        let next = edit(&tree, dyn_id(2), &patch).unwrap();
        let node = find_node(&next, dyn_id(2)).unwrap();
        assert_eq!(node.title, "Team");
        assert_eq!(node.rel.as_deref(), Some("nofollow"));
        assert!(node.download);
        assert_eq!(node.id, Some(20));
        // 原树不变
        assert_eq!(find_node(&tree, dyn_id(2)).unwrap().title, "item-20");

        assert_eq!(
            edit(&tree, dyn_id(42), &patch).unwrap_err(),
            MenuError::NodeNotFound(dyn_id(42))
        );
    }

    #[test]
    fn test_delete_removes_whole_subtree() {
        let mut ids = DynamicIdSequence::new();
        let rows = vec![
            flat(1, None, 1),
            flat(2, Some(1), 2),
            flat(3, Some(2), 3),
            flat(4, None, 1),
        ];
        let tree = hydrate(&rows, &mut ids);
        let target = find_node(&tree, dyn_id(2)).unwrap();
        let removed = 1 + target.descendant_count();

        let next = delete(&tree, dyn_id(2)).unwrap();
        assert_eq!(node_count(&next), node_count(&tree) - removed);
        assert!(find_node(&next, dyn_id(3)).is_none());
        let parents = structural_parents(&next);
        assert!(parents.values().all(|parent| *parent != Some(dyn_id(2))));
        assert_parents_consistent(&next);

        assert!(delete(&tree, dyn_id(77)).is_err());
    }

    #[test]
    fn test_flatten_nests_children_and_round_trips() {
        let rows = vec![
            flat(1, Some(0), 1),
            flat(2, Some(1), 2),
            flat(3, Some(1), 2),
            flat(4, Some(3), 3),
            flat(5, Some(0), 1),
        ];
        let mut ids = DynamicIdSequence::new();
        let payload = flatten(&hydrate(&rows, &mut ids));

        // (id, 父 id) 与兄弟顺序
        fn relations(items: &[MenuItemPayload], parent: Option<i64>, out: &mut Vec<(Option<i64>, Option<i64>)>) {
            for item in items {
                out.push((item.id, parent));
                if let Some(children) = &item.children {
                    assert!(!children.is_empty());
                    relations(children, item.id, out);
                }
            }
        }
        let mut actual = Vec::new();
        relations(&payload, Some(0), &mut actual);

        let expected: Vec<_> = vec![
            (Some(1), Some(0)),
            (Some(2), Some(1)),
            (Some(3), Some(1)),
            (Some(4), Some(3)),
            (Some(5), Some(0)),
        ];
        assert_eq!(actual, expected);
        assert!(payload[1].children.is_none());
        assert_eq!(payload[0].kind, "custom");
        assert_eq!(payload[0].target, "_self");
    }

    #[test]
    fn test_dynamic_ids_stay_unique_across_edits() {
        let (mut tree, mut ids) = sample_tree();

        for round in 0..5 {
            let (next, new_id) = append(
                &tree,
                MenuNodeDraft::new(format!("new-{}", round), MenuLink::custom("/")),
                &mut ids,
            );
            tree = next;
            tree = move_node(&tree, &MoveRequest::onto(new_id, dyn_id(1)))
                .unwrap()
                .tree;
            if round % 2 == 0 {
                tree = delete(&tree, new_id).unwrap();
            }
        }

        let all = collect_ids(&tree);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
        assert_eq!(ids.peek(), dyn_id(9));
        assert_parents_consistent(&tree);
    }

    #[test]
    fn test_parent_of() {
        let (tree, _) = sample_tree();
        assert_eq!(parent_of(&tree, dyn_id(2)), Some(Some(dyn_id(1))));
        assert_eq!(parent_of(&tree, dyn_id(1)), Some(None));
        assert_eq!(parent_of(&tree, dyn_id(9)), None);
    }
}
