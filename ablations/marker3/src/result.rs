//! 实验结果.

use crate::algos::Profile;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.3}"),
            None => "/".to_string(),
        }
    }

    #[inline]
    fn u64_to_display(u: Option<u64>) -> String {
        match u {
            Some(u) => u.to_string(),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Empty regions: {}", p.get_trivial())?;
    writeln!(w, "{S4}Grown regions: {}", p.get_target())?;
    writeln!(w, "{S4}Grown voxels in total: {}", p.get_voxels())?;
    writeln!(w, "{S4}Max stack depth: {}", p.get_max_stack())?;
    writeln!(w, "{S4}Marker footprint: {} bytes", p.get_marker_bytes())?;
    writeln!(w, "{S4}Effective total time: {} us", p.get_target_time_us())?;
    writeln!(
        w,
        "{S4}Effective average time: {} us",
        f64_to_display(p.get_avg_target_time_us())
    )?;
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    let t = p.get_most_time_consuming().map(|d| d.as_micros() as u64);
    write!(w, "{S4}Most time-consuming task costs {} us", u64_to_display(t))?;
    Ok(())
}

/// 消融实验最终结果.
pub struct AblationResult {
    data: Vec<(&'static str, Profile)>,
}

impl AblationResult {
    pub fn from_iter<I: IntoIterator<Item = (&'static str, Profile)>>(it: I) -> Self {
        Self {
            data: it.into_iter().collect(),
        }
    }

    /// 所有标记集合的生长结果是否一致.
    pub fn is_consistent(&self) -> bool {
        let mut it = self.data.iter().map(|(_, p)| (p.get_voxels(), p.get_target()));
        match it.next() {
            Some(first) => it.all(|v| v == first),
            None => true,
        }
    }

    /// 分析运行结果.
    pub fn analyze(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        utils::sep_to(&mut out)?;
        for (key, profile) in self.data.iter() {
            describe_into(key, profile, &mut out)?;
            writeln!(out)?;
            utils::sep_to(&mut out)?;
        }
        Ok(())
    }
}
