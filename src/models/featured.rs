use serde::Serialize;

/// Curated title shown when personalised recommendations are unavailable
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FeaturedMovie {
    pub title: &'static str,
    pub backdrop: &'static str,
    pub poster: &'static str,
}

pub const FEATURED_MOVIES: [FeaturedMovie; 12] = [
    FeaturedMovie {
        title: "Inception",
        backdrop: "https://image.tmdb.org/t/p/w1280/s3TBrRGB1iav7gFOCNx3H31MoES.jpg",
        poster: "https://image.tmdb.org/t/p/w500/tnAuB8q5vv7Ax9UAEje5Xi4BXik.jpg",
    },
    FeaturedMovie {
        title: "Interstellar",
        backdrop: "https://image.tmdb.org/t/p/w1280/rAiYTfKGqDCRIIqo664sY9XZIvQ.jpg",
        poster: "https://image.tmdb.org/t/p/w500/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg",
    },
    FeaturedMovie {
        title: "The Dark Knight",
        backdrop: "https://image.tmdb.org/t/p/w1280/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
        poster: "https://image.tmdb.org/t/p/w500/5KCVkau1HEl7ZzfPsKAPM0sMiKc.jpg",
    },
    FeaturedMovie {
        title: "The Matrix",
        backdrop: "https://image.tmdb.org/t/p/w1280/hEpWvX6Bp79eLxY1kX5ZZJcme5U.jpg",
        poster: "https://image.tmdb.org/t/p/w500/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
    },
    FeaturedMovie {
        title: "The Godfather",
        backdrop: "https://image.tmdb.org/t/p/w1280/rSPw7tgCH9c6NqICZef4kZjFOQ5.jpg",
        poster: "https://image.tmdb.org/t/p/w500/3bhkrj58Vtu7enYsRolD1fZdja1.jpg",
    },
    FeaturedMovie {
        title: "Spirited Away",
        backdrop: "https://image.tmdb.org/t/p/w1280/39wmItIWsg5sZMyRUHLkWBcuVCM.jpg",
        poster: "https://image.tmdb.org/t/p/w500/dL11DBPcRhWWnJcFXl9A07MrqTI.jpg",
    },
    FeaturedMovie {
        title: "Everything Everywhere All at Once",
        backdrop: "https://image.tmdb.org/t/p/w1280/w3LxiVYdWWRvEVdn5RYq6jIqkb1.jpg",
        poster: "https://image.tmdb.org/t/p/w500/rKvCys0fMIIi1X9rmJBxTPLAtoU.jpg",
    },
    FeaturedMovie {
        title: "La La Land",
        backdrop: "https://image.tmdb.org/t/p/w1280/uDO8zWDhfWwoFdKS4fzkUJt0Rf0.jpg",
        poster: "https://image.tmdb.org/t/p/w500/uDO8zWDhfWwoFdKS4fzkUJt0Rf0.jpg",
    },
    FeaturedMovie {
        title: "Avatar",
        backdrop: "https://image.tmdb.org/t/p/w1280/tVxDe01Zy3kZqaZRNiXFGDICdZk.jpg",
        poster: "https://image.tmdb.org/t/p/w500/jRXYjXNq0Cs2TcJjLkki24MLp7u.jpg",
    },
    FeaturedMovie {
        title: "Blade Runner 2049",
        backdrop: "https://image.tmdb.org/t/p/w1280/iFXdvfDcMpcnhLxG1dAaFru4kVl.jpg",
        poster: "https://image.tmdb.org/t/p/w500/gajva2L0rPYkEWjzgFlBXCAVBE5.jpg",
    },
    FeaturedMovie {
        title: "Parasite",
        backdrop: "https://image.tmdb.org/t/p/w1280/zdvIJN3Y0fanblcYyzV7nuG0mAW.jpg",
        poster: "https://image.tmdb.org/t/p/w500/7IiTTgloJzvGI1TAYymCfbfl3vT.jpg",
    },
    FeaturedMovie {
        title: "Mad Max: Fury Road",
        backdrop: "https://image.tmdb.org/t/p/w1280/hA2PLIxnNca8f6TCHqbbYVsYuj1.jpg",
        poster: "https://image.tmdb.org/t/p/w500/8tZYtuWezp8JbcsvHYO0O46tFbo.jpg",
    },
];
