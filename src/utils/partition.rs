//! 分组划分
//!
//! 根据项目的人数限制把学生名单划分为若干分组：
//! - `RANDOM`：先均匀打乱名单，再顺序切分
//! - `TEACHER` / `STUDENT`：只生成空的分组骨架，之后由教师或学生填充
//!
//! 这里只做计算，不做任何写入，调用方负责在事务内落库。

use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::errors::{PampError, Result};
use crate::models::groups::entities::NewGroup;
use crate::models::projects::entities::GroupsCreator;

/// 分组人数策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPolicy {
    pub min_per_group: usize,
    pub max_per_group: usize,
    pub max_groups: Option<usize>,
}

impl GroupPolicy {
    /// 由项目字段构造策略，缺失或矛盾的限制返回 BadRequest
    pub fn from_limits(
        min_per_group: Option<i32>,
        max_per_group: Option<i32>,
        max_groups: Option<i32>,
    ) -> Result<Self> {
        let (Some(min), Some(max)) = (min_per_group, max_per_group) else {
            return Err(PampError::bad_request(
                "minPerGroup and maxPerGroup must both be set to create groups",
            ));
        };
        if min < 1 {
            return Err(PampError::bad_request("minPerGroup must be at least 1"));
        }
        if max < min {
            return Err(PampError::bad_request(
                "maxPerGroup must be greater than or equal to minPerGroup",
            ));
        }
        let max_groups = match max_groups {
            Some(value) if value < 1 => {
                return Err(PampError::bad_request("maxGroups must be at least 1"));
            }
            Some(value) => Some(value as usize),
            None => None,
        };
        Ok(Self {
            min_per_group: min as usize,
            max_per_group: max as usize,
            max_groups,
        })
    }

    /// 名单人数与分组数上限是否兼容
    pub fn check_capacity(&self, students: usize) -> Result<()> {
        let needed = students.div_ceil(self.max_per_group);
        match self.max_groups {
            Some(max_groups) if needed > max_groups => Err(PampError::bad_request(format!(
                "Max groups ({max_groups}) and max students per group ({}) aren't compatible with the number of students ({students})",
                self.max_per_group
            ))),
            _ => Ok(()),
        }
    }
}

/// 计算随机分组的各组人数
///
/// 优先按 `max_per_group` 切分；最后一组不足 `min_per_group` 时，从前面的组
/// 依次挪人补齐（前面的组不会因此低于下限）。无法补齐时最后一组保持不足。
pub fn random_group_sizes(students: usize, policy: &GroupPolicy) -> Vec<usize> {
    if students == 0 {
        return Vec::new();
    }
    let max = policy.max_per_group;
    let min = policy.min_per_group;
    let count = students.div_ceil(max);

    let mut sizes = vec![max; count];
    let last = count - 1;
    sizes[last] = students - max * last;

    let mut deficit = min.saturating_sub(sizes[last]);
    for i in (0..last).rev() {
        if deficit == 0 {
            break;
        }
        let spare = sizes[i] - min;
        let moved = spare.min(deficit);
        sizes[i] -= moved;
        sizes[last] += moved;
        deficit -= moved;
    }
    sizes
}

fn group_name(index: usize) -> String {
    format!("Group {}", index + 1)
}

/// 打乱名单后按人数切分
pub fn plan_random_groups<R: Rng + ?Sized>(
    roster: &[Uuid],
    policy: &GroupPolicy,
    rng: &mut R,
) -> Vec<NewGroup> {
    let mut shuffled = roster.to_vec();
    shuffled.shuffle(rng);

    let mut remaining = shuffled.as_slice();
    random_group_sizes(roster.len(), policy)
        .into_iter()
        .enumerate()
        .map(|(index, size)| {
            let (members, rest) = remaining.split_at(size);
            remaining = rest;
            NewGroup {
                name: group_name(index),
                members: members.to_vec(),
            }
        })
        .collect()
}

/// 生成 `ceil(n / min_per_group)` 个空分组
pub fn plan_skeleton_groups(students: usize, policy: &GroupPolicy) -> Vec<NewGroup> {
    (0..students.div_ceil(policy.min_per_group))
        .map(|index| NewGroup {
            name: group_name(index),
            members: Vec::new(),
        })
        .collect()
}

/// 按分组方式生成完整方案；先校验容量，失败时不产生任何分组
pub fn plan_groups<R: Rng + ?Sized>(
    creator: GroupsCreator,
    roster: &[Uuid],
    policy: &GroupPolicy,
    rng: &mut R,
) -> Result<Vec<NewGroup>> {
    policy.check_capacity(roster.len())?;
    Ok(match creator {
        GroupsCreator::Random => plan_random_groups(roster, policy, rng),
        GroupsCreator::Teacher | GroupsCreator::Student => {
            plan_skeleton_groups(roster.len(), policy)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn policy(min: usize, max: usize, max_groups: Option<usize>) -> GroupPolicy {
        GroupPolicy {
            min_per_group: min,
            max_per_group: max,
            max_groups,
        }
    }

    fn roster(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_policy_requires_both_limits() {
        assert!(GroupPolicy::from_limits(None, Some(4), None).is_err());
        assert!(GroupPolicy::from_limits(Some(2), None, None).is_err());
        assert!(GroupPolicy::from_limits(Some(0), Some(4), None).is_err());
        assert!(GroupPolicy::from_limits(Some(5), Some(4), None).is_err());
        assert!(GroupPolicy::from_limits(Some(2), Some(4), Some(0)).is_err());
        assert_eq!(
            GroupPolicy::from_limits(Some(2), Some(4), Some(3)).ok(),
            Some(policy(2, 4, Some(3)))
        );
    }

    #[test]
    fn test_capacity_check() {
        let p = policy(2, 4, Some(2));
        assert!(p.check_capacity(8).is_ok());
        assert!(matches!(p.check_capacity(9), Err(PampError::BadRequest(_))));
        assert!(policy(2, 4, None).check_capacity(1000).is_ok());
    }

    #[test]
    fn test_fixed_size_keeps_remainder() {
        assert_eq!(random_group_sizes(10, &policy(4, 4, None)), vec![4, 4, 2]);
        assert_eq!(random_group_sizes(12, &policy(4, 4, None)), vec![4, 4, 4]);
        assert_eq!(random_group_sizes(3, &policy(4, 4, None)), vec![3]);
    }

    #[test]
    fn test_flexible_rebalances_last_group() {
        // 4,4,2 -> 最后一组补到 3
        assert_eq!(random_group_sizes(10, &policy(3, 4, None)), vec![4, 3, 3]);
        // 5,1 -> 3,3
        assert_eq!(random_group_sizes(6, &policy(3, 5, None)), vec![3, 3]);
        assert_eq!(random_group_sizes(13, &policy(3, 5, None)), vec![5, 5, 3]);
    }

    #[test]
    fn test_flexible_leaves_undersized_when_impossible() {
        // 5 人，每组 3-4：4,1 -> 只能挪 1 人，得到 3,2
        assert_eq!(random_group_sizes(5, &policy(3, 4, None)), vec![3, 2]);
        assert_eq!(random_group_sizes(1, &policy(2, 3, None)), vec![1]);
    }

    #[test]
    fn test_sizes_cover_every_student() {
        for n in 0..60 {
            for min in 1..6 {
                for max in min..8 {
                    let p = policy(min, max, None);
                    let sizes = random_group_sizes(n, &p);
                    assert_eq!(sizes.iter().sum::<usize>(), n);
                    if let Some((last, head)) = sizes.split_last() {
                        assert!(head.iter().all(|s| (min..=max).contains(s)));
                        assert!(*last >= 1 && *last <= max);
                    }
                }
            }
        }
    }

    #[test]
    fn test_random_plan_assigns_each_student_once() {
        let students = roster(10);
        let mut rng = StdRng::seed_from_u64(7);
        let groups = plan_random_groups(&students, &policy(4, 4, None), &mut rng);

        let sizes: Vec<usize> = groups.iter().map(|g| g.members.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Group 1", "Group 2", "Group 3"]);

        let assigned: HashSet<Uuid> = groups.iter().flat_map(|g| g.members.clone()).collect();
        assert_eq!(assigned, students.iter().copied().collect::<HashSet<_>>());
    }

    #[test]
    fn test_random_plan_is_deterministic_for_seed() {
        let students = roster(9);
        let p = policy(2, 3, None);
        let a = plan_random_groups(&students, &p, &mut StdRng::seed_from_u64(42));
        let b = plan_random_groups(&students, &p, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_skeleton_groups_are_empty() {
        let groups = plan_skeleton_groups(10, &policy(3, 5, None));
        assert_eq!(groups.len(), 4);
        assert!(groups.iter().all(|g| g.members.is_empty()));
        assert_eq!(groups[3].name, "Group 4");
        assert!(plan_skeleton_groups(0, &policy(3, 5, None)).is_empty());
    }

    #[test]
    fn test_plan_groups_checks_capacity_first() {
        let students = roster(10);
        let mut rng = StdRng::seed_from_u64(1);
        let result = plan_groups(
            GroupsCreator::Teacher,
            &students,
            &policy(2, 4, Some(2)),
            &mut rng,
        );
        assert!(matches!(result, Err(PampError::BadRequest(_))));

        let groups = plan_groups(
            GroupsCreator::Student,
            &students,
            &policy(2, 4, Some(5)),
            &mut rng,
        )
        .expect("within capacity");
        assert_eq!(groups.len(), 5);
    }
}
