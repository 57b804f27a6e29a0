/// 临时标签的并查集. 生命周期仅限于一次标记调用.
///
/// 下标 0 保留给背景, 不参与合并. 合并时总是把数值较大的根挂到数值较小的根下,
/// 所以每个集合的根 ("chief") 始终是集合中最小的临时标签.
#[derive(Debug)]
pub(super) struct UnionFind {
    parent: Vec<usize>,
    merges: usize,
}

impl UnionFind {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut parent = Vec::with_capacity(capacity.max(1));
        parent.push(0);
        Self { parent, merges: 0 }
    }

    /// 已分配的临时标签个数 (不含背景).
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len() - 1
    }

    /// 实际发生的合并次数.
    #[inline]
    pub fn merges(&self) -> usize {
        self.merges
    }

    /// 分配一个新的临时标签并返回. 新标签自成一个集合.
    #[inline]
    pub fn make_set(&mut self) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        id
    }

    /// 查找 `label` 的根, 顺带进行路径减半.
    pub fn find(&mut self, label: usize) -> usize {
        let mut cur = label;
        while self.parent[cur] != cur {
            self.parent[cur] = self.parent[self.parent[cur]];
            cur = self.parent[cur];
        }
        cur
    }

    /// 记录 `a` 与 `b` 等价, 返回合并后的根.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return ra;
        }
        let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[child] = root;
        self.merges += 1;
        root
    }

    /// 消费并查集, 为每个临时标签分配最终标签.
    ///
    /// 最终标签从 1 开始连续编号, 按根的大小递增排列. 返回值的第二个分量为最终标签个数.
    /// 返回的 `Vec` 以临时标签为下标, 第 0 项恒为 0.
    pub fn resolve(mut self) -> (Vec<usize>, usize) {
        let mut table = vec![0usize; self.parent.len()];
        let mut count = 0usize;
        for t in 1..table.len() {
            let root = self.find(t);
            if root == t {
                count += 1;
                table[t] = count;
            } else {
                // 根是集合中最小的标签, 其最终标签已在之前的迭代中确定.
                debug_assert!(root < t);
                table[t] = table[root];
            }
        }
        (table, count)
    }
}
