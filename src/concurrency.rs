//! Bounded parallelism across monthly files: at most `limit` files in flight,
//! each chunk folded into the accumulator in input order before the next starts.

use crate::mem::wait_for_memory;
use crate::paths::FileJob;
use anyhow::Result;
use rayon::prelude::*;

pub fn fold_files_limited<T, A, F, M>(
    files: &[FileJob],
    limit: usize,
    mem_threshold: f64,
    init: A,
    f: F,
    mut merge: M,
) -> Result<A>
where
    T: Send,
    F: Sync + Fn(&FileJob) -> Result<T>,
    M: FnMut(&mut A, T),
{
    let run = |job: &FileJob| {
        wait_for_memory(mem_threshold);
        f(job)
    };
    let mut acc = init;
    for chunk in files.chunks(limit.max(1)) {
        if let [job] = chunk {
            merge(&mut acc, run(job)?);
            continue;
        }
        let part = chunk.par_iter().map(|job| run(job)).collect::<Result<Vec<_>>>()?;
        for r in part {
            merge(&mut acc, r);
        }
    }
    Ok(acc)
}
