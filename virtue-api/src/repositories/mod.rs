mod book_request_repo;
mod church_repo;
mod comment_repo;
mod poverty_data_repo;
mod repo_error;
mod thread_repo;
mod vote_repo;

pub use book_request_repo::{BookRequest, BookRequestRepository, BookRequestRepositoryImpl, NewBookRequest};
pub use church_repo::{Church, ChurchRepository, ChurchRepositoryImpl, NewChurch};
pub use comment_repo::{Comment, CommentRepository, CommentRepositoryImpl, NewComment};
pub use poverty_data_repo::{
    NewPovertyDataSource, PovertyDataFilter, PovertyDataPage, PovertyDataRepository,
    PovertyDataRepositoryImpl, PovertyDataSource,
};
pub use repo_error::RepositoryError;
pub use thread_repo::{NewThread, Thread, ThreadRepository, ThreadRepositoryImpl};
pub use vote_repo::{NewVote, Vote, VoteRepository, VoteRepositoryImpl};
