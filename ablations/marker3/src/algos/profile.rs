//! 算法运行统计.

use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时 (`self.start()`).
    #[inline]
    pub fn new() -> Self {
        Self {
            consumed: Duration::ZERO,
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    pub fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    ///
    /// # 注意
    ///
    /// 上一次调用必须是 `self.start()`, 否则计算时间值无意义.
    #[inline]
    pub fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 累计时间 (微秒).
    #[inline]
    pub fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

impl Default for AccTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// 某一种标记集合在全部用例上的统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 种子不可生长 (区域为空) 的次数.
    trivial: u64,

    /// 成功生长的次数.
    target: u64,

    /// 区域生长花费的总时间.
    target_time: AccTimer,

    /// 整个任务花费的总时间 (包括构造标记集合以外的一切开销).
    real_time: AccTimer,

    /// 最耗时的一次生长.
    most: Option<Duration>,

    /// 累计生长体素个数.
    voxels: u64,

    /// 出现过的最大栈深度.
    max_stack: usize,

    /// 标记集合的近似内存占用 (字节), 取所有用例中的最大值.
    marker_bytes: usize,
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            trivial: 0,
            target: 0,
            target_time: AccTimer::default(),
            real_time: AccTimer::default(),
            most: None,
            voxels: 0,
            max_stack: 0,
            marker_bytes: 0,
        }
    }

    /// 记录一次空生长.
    #[inline]
    pub fn count_trivial(&mut self) {
        self.trivial += 1;
    }

    /// 开始一次生长计时.
    #[inline]
    pub fn target_start(&mut self) {
        self.target_time.start();
    }

    /// 结束一次生长计时, 并记录生长结果.
    pub fn target_elapsed(&mut self, voxels: usize, max_stack: usize) {
        let d = self.target_time.elapsed();
        self.target += 1;
        self.most = Some(self.most.map_or(d, |m| m.max(d)));
        self.voxels += voxels as u64;
        self.max_stack = self.max_stack.max(max_stack);
    }

    /// 记录标记集合的内存占用.
    #[inline]
    pub fn count_marker_bytes(&mut self, bytes: usize) {
        self.marker_bytes = self.marker_bytes.max(bytes);
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 获得空生长次数.
    #[inline]
    pub fn get_trivial(&self) -> u64 {
        self.trivial
    }

    /// 获得成功生长次数.
    #[inline]
    pub fn get_target(&self) -> u64 {
        self.target
    }

    /// 获得累计生长体素个数.
    #[inline]
    pub fn get_voxels(&self) -> u64 {
        self.voxels
    }

    /// 获得最大栈深度.
    #[inline]
    pub fn get_max_stack(&self) -> usize {
        self.max_stack
    }

    /// 获得标记集合的最大内存占用.
    #[inline]
    pub fn get_marker_bytes(&self) -> usize {
        self.marker_bytes
    }

    /// 以微秒为单位获得生长的总花费时间.
    #[inline]
    pub fn get_target_time_us(&self) -> u64 {
        self.target_time.get_total_us()
    }

    /// 以微秒为单位获得运行到目前的总时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 以微秒为单位获得单次生长的平均时间.
    #[inline]
    pub fn get_avg_target_time_us(&self) -> Option<f64> {
        match self.target {
            0 => None,
            target => Some(self.get_target_time_us() as f64 / target as f64),
        }
    }

    /// 获取最耗时的一次生长所消耗的时间. 如果不存在任务, 则返回 `None`.
    #[inline]
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        self.most
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
