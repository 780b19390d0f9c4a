use std::collections::HashSet;

use dinematch_common::{
    env::{consensus::types::RankedPlace, session::SessionSnapshot},
    error::{DineError, Result},
};
use tracing::debug;

/// Ranks the voted candidates of a session by descending agreement.
///
/// Agreement is `100 * likes / members`, with the member count taken from the
/// snapshot, so a member who joined twice counts twice. Only likes from
/// member ids in the snapshot are counted; flags left by anyone who never
/// joined are ignored. Candidates nobody voted on are left out, as are votes
/// for places that are not candidates. Ties keep the order of the candidate
/// list.
///
/// Fails with `NoMembers` when the session has nobody to divide by.
pub fn rank(snapshot: &SessionSnapshot) -> Result<Vec<RankedPlace>> {
    let total_members = snapshot.member_count();
    if total_members == 0 {
        return Err(DineError::NoMembers(snapshot.id.clone()));
    }

    let members: HashSet<&str> = snapshot.members.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut ranking = Vec::with_capacity(snapshot.votes.len());

    for place in &snapshot.places {
        if !seen.insert(place.place_id.as_str()) {
            continue;
        }
        let Some(flags) = snapshot.votes.get_votes(&place.place_id) else {
            continue;
        };

        let member_flags = || flags.iter().filter(|(member, _)| members.contains(member.as_str()));
        let likes = member_flags().filter(|(_, liked)| **liked).count();
        let agreement = 100.0 * likes as f64 / total_members as f64;

        ranking.push(RankedPlace {
            place_id: place.place_id.clone(),
            name: place.name.clone(),
            agreement,
            likes,
            votes: member_flags().count(),
        });
    }

    let orphaned = snapshot.votes.len() - ranking.len();
    if orphaned > 0 {
        debug!("[{}] ignoring votes on {} non-candidate place(s)", snapshot.id, orphaned);
    }

    // stable: equal agreement keeps candidate order
    ranking.sort_by(|a, b| b.agreement.total_cmp(&a.agreement));

    Ok(ranking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinematch_common::{Parameters, Place, Session};

    fn session(places: &[(&str, &str)], members: &[&str]) -> Session {
        let places = places.iter().map(|(id, name)| Place::new(*id, *name)).collect();
        let mut session = Session::new(Parameters { distance: 1000, price: 2, rating: 4.0 }, places);
        session.members = members.iter().map(|m| m.to_string()).collect();
        session
    }

    fn names(ranking: &[RankedPlace]) -> Vec<(&str, f64)> {
        ranking.iter().map(|r| (r.name.as_str(), r.agreement)).collect()
    }

    #[test]
    fn test_alpha_beta_scenario() {
        let mut s = session(&[("p1", "Alpha"), ("p2", "Beta")], &["m1", "m2"]);
        s.votes.record("p1", "m1", true);
        s.votes.record("p1", "m2", true);
        s.votes.record("p2", "m1", false);

        let ranking = rank(&s.snapshot("s1")).unwrap();
        assert_eq!(names(&ranking), vec![("Alpha", 100.0), ("Beta", 0.0)]);
        assert_eq!(ranking[0].likes, 2);
        assert_eq!(ranking[1].votes, 1);
    }

    #[test]
    fn test_no_members_is_an_error() {
        let mut s = session(&[("p1", "Alpha")], &[]);
        s.votes.record("p1", "m1", true);

        let err = rank(&s.snapshot("s1")).unwrap_err();
        assert!(matches!(err, DineError::NoMembers(id) if id == "s1"));
    }

    #[test]
    fn test_no_members_and_no_votes_is_still_an_error() {
        let s = session(&[("p1", "Alpha")], &[]);
        assert!(matches!(rank(&s.snapshot("s1")), Err(DineError::NoMembers(_))));
    }

    #[test]
    fn test_no_votes_yields_empty_report() {
        let s = session(&[("p1", "Alpha"), ("p2", "Beta")], &["m1"]);
        assert!(rank(&s.snapshot("s1")).unwrap().is_empty());
    }

    #[test]
    fn test_unvoted_place_is_absent_not_zero() {
        let mut s = session(&[("p1", "Alpha"), ("p2", "Beta"), ("p3", "Gamma")], &["m1", "m2"]);
        s.votes.record("p1", "m1", true);
        s.votes.record("p3", "m2", false);

        let ranking = rank(&s.snapshot("s1")).unwrap();
        assert_eq!(names(&ranking), vec![("Alpha", 50.0), ("Gamma", 0.0)]);
    }

    #[test]
    fn test_last_vote_is_the_one_counted() {
        let mut s = session(&[("p1", "Alpha")], &["m1"]);
        s.votes.record("p1", "m1", true);
        s.votes.record("p1", "m1", false);
        s.votes.record("p1", "m1", true);
        assert_eq!(names(&rank(&s.snapshot("s1")).unwrap()), vec![("Alpha", 100.0)]);

        s.votes.record("p1", "m1", false);
        assert_eq!(names(&rank(&s.snapshot("s1")).unwrap()), vec![("Alpha", 0.0)]);
    }

    #[test]
    fn test_duplicate_join_halves_agreement() {
        let mut s = session(&[("p1", "Alpha")], &["m1"]);
        s.votes.record("p1", "m1", true);
        assert_eq!(names(&rank(&s.snapshot("s1")).unwrap()), vec![("Alpha", 100.0)]);

        s.members.push("m1".into());
        assert_eq!(names(&rank(&s.snapshot("s1")).unwrap()), vec![("Alpha", 50.0)]);
    }

    #[test]
    fn test_votes_on_non_candidates_are_omitted() {
        let mut s = session(&[("p1", "Alpha")], &["m1"]);
        s.votes.record("p404", "m1", true);
        s.votes.record("p1", "m1", true);

        let ranking = rank(&s.snapshot("s1")).unwrap();
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].place_id, "p1");
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let places = [("p1", "Alpha"), ("p2", "Beta"), ("p3", "Gamma"), ("p4", "Delta")];
        let mut s = session(&places, &["m1", "m2"]);
        s.votes.record("p4", "m1", true);
        s.votes.record("p3", "m1", true);
        s.votes.record("p2", "m1", true);
        s.votes.record("p2", "m2", true);
        s.votes.record("p1", "m2", true);

        let snap = s.snapshot("s1");
        let first = rank(&snap).unwrap();
        assert_eq!(
            names(&first),
            vec![("Beta", 100.0), ("Alpha", 50.0), ("Gamma", 50.0), ("Delta", 50.0)]
        );

        for _ in 0..10 {
            assert_eq!(rank(&snap).unwrap(), first);
        }
    }

    #[test]
    fn test_duplicate_candidates_are_reported_once() {
        let mut s = session(&[("p1", "Alpha"), ("p1", "Alpha again")], &["m1"]);
        s.votes.record("p1", "m1", true);

        assert_eq!(names(&rank(&s.snapshot("s1")).unwrap()), vec![("Alpha", 100.0)]);
    }

    #[test]
    fn test_likes_from_non_members_are_ignored() {
        let mut s = session(&[("p1", "Alpha"), ("p2", "Beta")], &["m1"]);
        s.votes.record("p1", "m1", true);
        s.votes.record("p1", "outsider", true);
        s.votes.record("p2", "outsider", true);

        let ranking = rank(&s.snapshot("s1")).unwrap();
        assert_eq!(names(&ranking), vec![("Alpha", 100.0), ("Beta", 0.0)]);
        assert_eq!(ranking[0].likes, 1);
        assert_eq!(ranking[0].votes, 1);
        assert_eq!(ranking[1].votes, 0);
        assert!(ranking.iter().all(|r| r.agreement <= 100.0));
    }

    #[test]
    fn test_duplicate_join_with_outsider_like_stays_at_half() {
        let mut s = session(&[("p1", "Alpha")], &["m1", "m1"]);
        s.votes.record("p1", "m1", true);
        s.votes.record("p1", "outsider", true);

        assert_eq!(names(&rank(&s.snapshot("s1")).unwrap()), vec![("Alpha", 50.0)]);
    }
}
