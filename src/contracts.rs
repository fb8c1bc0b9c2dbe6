//! Solidity interfaces of the two contracts the oracle talks to.

alloy::sol! {
    /// Content registry deployed on the source chain.
    #[allow(missing_docs)]
    interface IContentRegistry {
        event ContentSubmitted(address indexed author, string content, uint256 timestamp);
    }

    /// Access-control contract deployed on the destination chain.
    #[allow(missing_docs)]
    interface IGuardian {
        function flagAddress(address maliciousAddress) external;
    }
}
